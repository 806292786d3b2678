use crate::commands::{CmdMessage, CmdResult};
use crate::error::{NumberingError, Result};
use crate::host::fs::DrawingFile;
use crate::model::TargetSpec;
use crate::scan;

/// Reports the value numbering would start from for `(container, tag)`,
/// without touching the drawing.
///
/// A container name that matches nothing is a user mistake, not a failure:
/// it comes back as an error-level message with the names that do exist.
pub fn run(drawing: &DrawingFile, container: &str, tag: &str) -> Result<CmdResult> {
    let model = drawing.to_memory();

    let Some(id) = model.find_container(container) else {
        let err = NumberingError::SelectionMismatch(format!(
            "No container named \"{}\" in this drawing (have: {})",
            container,
            model.container_names().join(", ")
        ));
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::error(err.to_string()));
        return Ok(result);
    };

    let spec = TargetSpec::new(id, tag)?;
    let seed = scan::compute_seed(&model, &spec)?;

    let mut result = CmdResult::default().with_next_value(seed);
    result.add_message(CmdMessage::info(format!(
        "{} / {} would number from {}",
        container,
        spec.tag(),
        seed
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::error::NumberingError;

    fn drawing() -> DrawingFile {
        serde_json::from_str(
            r#"{
                "containers": [
                    { "name": "DOOR",
                      "references": [
                        { "attributes": [ { "tag": "ID", "text": "3" } ] },
                        { "attributes": [ { "tag": "ID", "text": "7" } ] },
                        { "attributes": [ { "tag": "ID", "text": "2" } ] }
                      ] }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn reports_the_seed() {
        let result = run(&drawing(), "door", "id").unwrap();
        assert_eq!(result.next_value, Some(8));
    }

    #[test]
    fn unknown_container_is_a_message_not_an_error() {
        let result = run(&drawing(), "WINDOW", "ID").unwrap();
        assert_eq!(result.next_value, None);
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(result.messages[0].content.contains("WINDOW"));
        assert!(result.messages[0].content.contains("DOOR"));
    }

    #[test]
    fn blank_tag_is_rejected() {
        let err = run(&drawing(), "DOOR", " ").unwrap_err();
        assert!(matches!(err, NumberingError::InvalidArgument(_)));
    }
}
