use std::sync::Arc;

use crate::commands::{AssignedValue, CmdMessage, CmdResult};
use crate::controller::NumberingController;
use crate::error::{NumberingError, Result};
use crate::host::fs::DrawingFile;
use crate::session::NumberingSession;

/// Numbers the drawing's pending commits for `(container, tag)` and folds
/// them back into their containers.
///
/// A controller is constructed fresh (seeding by scan), enabled for the
/// replay, and torn down before returning; the counter does not persist
/// between runs. `seed` overrides the starting value and must not fall
/// below the scanned one — that floor belongs to this surface, not to the
/// assigner.
pub fn run(
    drawing: &mut DrawingFile,
    container: &str,
    tag: &str,
    seed: Option<i64>,
) -> Result<CmdResult> {
    let model = Arc::new(drawing.to_memory());
    let mut result = CmdResult::default();

    let Some(id) = model.find_container(container) else {
        let err = NumberingError::SelectionMismatch(format!(
            "No container named \"{}\" in this drawing (have: {})",
            container,
            model.container_names().join(", ")
        ));
        result.add_message(CmdMessage::error(err.to_string()));
        return Ok(result);
    };

    let mut session = NumberingSession::new();
    let controller = session.install(NumberingController::new(
        model.as_ref(),
        Arc::clone(&model),
        id,
        tag,
    )?);

    if let Some(value) = seed {
        let floor = controller.peek_next();
        if value < floor {
            result.add_message(CmdMessage::error(format!(
                "Seed {} is below the next value {}; numbers would repeat",
                value, floor
            )));
            return Ok(result);
        }
        controller.set_next(value);
    }

    controller.set_enabled(true);
    let mut objects = drawing.pending_objects();
    for object in &mut objects {
        let before = object.text.clone();
        model.commit(object)?;
        if object.text != before {
            result.assigned.push(AssignedValue {
                container: object.container.clone().unwrap_or_default(),
                tag: object.tag.clone(),
                value: object.text.clone(),
            });
        }
    }

    result.next_value = Some(controller.peek_next());
    session.clear();

    for name in drawing.absorb(&objects) {
        result.add_message(CmdMessage::warning(format!(
            "Committed object references unknown container \"{}\"; left pending",
            name
        )));
    }

    result.add_message(CmdMessage::success(format!(
        "Assigned {} value(s); next is {}",
        result.assigned.len(),
        result.next_value.unwrap_or(1)
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;

    fn drawing() -> DrawingFile {
        serde_json::from_str(
            r#"{
                "containers": [
                    { "name": "DOOR",
                      "references": [
                        { "attributes": [ { "tag": "ID", "text": "5" } ] }
                      ] }
                ],
                "pending": [
                    { "container": "DOOR", "tag": "ID" },
                    { "container": "DOOR", "tag": "ID" },
                    { "container": "DOOR", "tag": "ID" }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn numbers_pending_commits_in_order() {
        let mut drawing = drawing();
        let result = run(&mut drawing, "DOOR", "ID", None).unwrap();

        let values: Vec<&str> = result.assigned.iter().map(|a| a.value.as_str()).collect();
        assert_eq!(values, vec!["6", "7", "8"]);
        assert_eq!(result.next_value, Some(9));

        // Folded back: DOOR now has four references and nothing pending
        assert_eq!(drawing.containers[0].references.len(), 4);
        assert!(drawing.pending.is_empty());
    }

    #[test]
    fn pre_existing_pending_objects_are_skipped() {
        let mut drawing = drawing();
        drawing.pending[1].newly_created = false;
        drawing.pending[1].text = "keep".to_string();

        let result = run(&mut drawing, "DOOR", "ID", None).unwrap();
        let values: Vec<&str> = result.assigned.iter().map(|a| a.value.as_str()).collect();
        assert_eq!(values, vec!["6", "7"]);

        // The untouched object still lands in its container, text intact
        let texts: Vec<&str> = drawing.containers[0]
            .references
            .iter()
            .map(|r| r.attributes[0].text.as_str())
            .collect();
        assert!(texts.contains(&"keep"));
    }

    #[test]
    fn seed_override_jumps_forward() {
        let mut drawing = drawing();
        let result = run(&mut drawing, "DOOR", "ID", Some(50)).unwrap();
        let values: Vec<&str> = result.assigned.iter().map(|a| a.value.as_str()).collect();
        assert_eq!(values, vec!["50", "51", "52"]);
    }

    #[test]
    fn seed_below_floor_is_refused() {
        let mut drawing = drawing();
        let result = run(&mut drawing, "DOOR", "ID", Some(3)).unwrap();
        assert!(result.assigned.is_empty());
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        // Nothing was replayed or absorbed
        assert_eq!(drawing.pending.len(), 3);
    }

    #[test]
    fn second_run_continues_where_the_first_left_off() {
        let mut drawing = drawing();
        run(&mut drawing, "DOOR", "ID", None).unwrap();

        drawing.pending.push(crate::host::fs::PendingRecord {
            container: "DOOR".to_string(),
            tag: "ID".to_string(),
            text: String::new(),
            newly_created: true,
            writable: true,
        });
        let result = run(&mut drawing, "DOOR", "ID", None).unwrap();
        assert_eq!(result.assigned[0].value, "9");
    }

    #[test]
    fn unknown_container_reports_and_leaves_drawing_alone() {
        let mut drawing = drawing();
        let result = run(&mut drawing, "WINDOW", "ID", None).unwrap();
        assert!(result.assigned.is_empty());
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert_eq!(drawing.pending.len(), 3);
    }
}
