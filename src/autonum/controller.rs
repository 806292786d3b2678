//! The interception controller: owns the enable/disable state machine and
//! the commit handler that does the numbering.

use std::sync::Arc;

use crate::error::Result;
use crate::host::{CommitHandler, NotificationStream, ObjectModel, SubscriptionId, TrackedObject};
use crate::model::{ContainerId, DocumentId, InterceptionState, ObjectClass, TargetSpec};
use crate::scan;
use crate::seq::SharedAssigner;

/// Numbers every newly created attribute value matching the target tag, for
/// as long as it is enabled.
///
/// Construction scans the drawing once to seed the counter; after that the
/// only reads are the fields of each committed object. The subscription on
/// the stream is owned exclusively by this controller and is released on
/// disable and on drop, so it can never outlive its owner.
pub struct NumberingController<S: NotificationStream> {
    spec: TargetSpec,
    document: DocumentId,
    assigner: SharedAssigner,
    stream: Arc<S>,
    subscription: Option<SubscriptionId>,
    on_enabled_changed: Option<Box<dyn Fn(bool) + Send + Sync>>,
}

impl<S: NotificationStream> NumberingController<S> {
    /// Validates the target, primes the counter from a scan, and starts out
    /// disabled. A tag that is empty or a container that does not resolve
    /// fails here; no controller is created.
    pub fn new<M: ObjectModel>(
        model: &M,
        stream: Arc<S>,
        container: ContainerId,
        tag: &str,
    ) -> Result<Self> {
        let spec = TargetSpec::new(container, tag)?;
        let seed = scan::compute_seed(model, &spec)?;
        Ok(Self {
            spec,
            document: model.document(),
            assigner: SharedAssigner::new(seed),
            stream,
            subscription: None,
            on_enabled_changed: None,
        })
    }

    pub fn state(&self) -> InterceptionState {
        if self.subscription.is_some() {
            InterceptionState::Enabled
        } else {
            InterceptionState::Disabled
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.subscription.is_some()
    }

    /// Extension point fired after each actual state transition, with the
    /// new enabled flag. Same-state requests never fire it.
    pub fn on_enabled_changed(&mut self, hook: impl Fn(bool) + Send + Sync + 'static) {
        self.on_enabled_changed = Some(Box::new(hook));
    }

    /// Moves between `Disabled` and `Enabled`. Requesting the current state
    /// is a no-op; there is never more than one live subscription.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.is_enabled() {
            return;
        }
        if enabled {
            let handler = Self::commit_handler(
                self.spec.clone(),
                self.document,
                self.assigner.clone(),
            );
            self.subscription = Some(
                self.stream
                    .subscribe(ObjectClass::AttributeValue, handler),
            );
        } else if let Some(id) = self.subscription.take() {
            self.stream.unsubscribe(id);
        }
        if let Some(hook) = &self.on_enabled_changed {
            hook(enabled);
        }
    }

    fn commit_handler(
        spec: TargetSpec,
        document: DocumentId,
        assigner: SharedAssigner,
    ) -> CommitHandler {
        Arc::new(move |object: &mut dyn TrackedObject| {
            // The stream is keyed by class, but the handler narrows the type
            // itself rather than trusting the key.
            if object.class() != ObjectClass::AttributeValue
                || object.document() != document
                || !object.is_newly_created()
                || !object.is_writable()
                || !spec.matches_tag(object.tag())
            {
                return Ok(());
            }
            let value = assigner.take_next();
            object.set_text(&value)
        })
    }

    pub fn target(&self) -> &TargetSpec {
        &self.spec
    }

    pub fn peek_next(&self) -> i64 {
        self.assigner.peek_next()
    }

    pub fn set_next(&self, value: i64) {
        self.assigner.set_next(value)
    }
}

impl<S: NotificationStream> Drop for NumberingController<S> {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.stream.unsubscribe(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NumberingError;
    use crate::host::memory::fixtures::DrawingFixture;
    use crate::host::memory::{CommittedObject, MemoryDrawing};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn drawing_with(texts: &[&str]) -> Arc<MemoryDrawing> {
        Arc::new(
            DrawingFixture::new()
                .with_tagged_refs("DOOR", "ID", texts)
                .drawing,
        )
    }

    fn controller_over(
        drawing: &Arc<MemoryDrawing>,
        tag: &str,
    ) -> NumberingController<MemoryDrawing> {
        let id = drawing.find_container("DOOR").unwrap();
        NumberingController::new(drawing.as_ref(), Arc::clone(drawing), id, tag).unwrap()
    }

    #[test]
    fn construction_primes_from_scan() {
        let drawing = drawing_with(&["3", "7", "2"]);
        let controller = controller_over(&drawing, "id");
        assert_eq!(controller.peek_next(), 8);
        assert_eq!(controller.target().tag(), "ID");
        assert_eq!(controller.state(), InterceptionState::Disabled);
    }

    #[test]
    fn construction_rejects_blank_tag() {
        let drawing = drawing_with(&[]);
        let id = drawing.find_container("DOOR").unwrap();
        let result =
            NumberingController::new(drawing.as_ref(), Arc::clone(&drawing), id, "  ");
        assert!(matches!(result, Err(NumberingError::InvalidArgument(_))));
    }

    #[test]
    fn construction_rejects_unresolvable_container() {
        let drawing = drawing_with(&[]);
        let result = NumberingController::new(
            drawing.as_ref(),
            Arc::clone(&drawing),
            ContainerId::new(),
            "ID",
        );
        assert!(matches!(result, Err(NumberingError::InvalidReference(_))));
    }

    #[test]
    fn enable_disable_is_idempotent() {
        let drawing = drawing_with(&[]);
        let mut controller = controller_over(&drawing, "ID");

        controller.set_enabled(true);
        controller.set_enabled(true);
        assert_eq!(drawing.subscription_count(), 1);
        assert!(controller.is_enabled());

        controller.set_enabled(false);
        controller.set_enabled(false);
        assert_eq!(drawing.subscription_count(), 0);
        assert_eq!(controller.state(), InterceptionState::Disabled);
    }

    #[test]
    fn hook_fires_only_on_transitions() {
        let drawing = drawing_with(&[]);
        let mut controller = controller_over(&drawing, "ID");
        let fired = Arc::new(AtomicUsize::new(0));
        {
            let fired = fired.clone();
            controller.on_enabled_changed(move |_| {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }

        controller.set_enabled(true);
        controller.set_enabled(true); // no-op, no fire
        controller.set_enabled(false);
        controller.set_enabled(false); // no-op, no fire
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn drop_releases_the_subscription() {
        let drawing = drawing_with(&[]);
        let mut controller = controller_over(&drawing, "ID");
        controller.set_enabled(true);
        assert_eq!(drawing.subscription_count(), 1);
        drop(controller);
        assert_eq!(drawing.subscription_count(), 0);
    }

    #[test]
    fn numbers_only_newly_created_objects() {
        let drawing = drawing_with(&[]);
        let mut controller = controller_over(&drawing, "ID");
        controller.set_enabled(true);

        let mut fresh = CommittedObject::new_attribute(drawing.document(), "ID");
        let mut stale = CommittedObject::new_attribute(drawing.document(), "ID")
            .with_text("untouched")
            .pre_existing();

        drawing.commit(&mut fresh).unwrap();
        drawing.commit(&mut stale).unwrap();

        assert_eq!(fresh.text, "1");
        assert_eq!(stale.text, "untouched");
    }

    #[test]
    fn skips_read_only_and_foreign_and_mismatched_objects() {
        let drawing = drawing_with(&[]);
        let mut controller = controller_over(&drawing, "ID");
        controller.set_enabled(true);

        let mut read_only =
            CommittedObject::new_attribute(drawing.document(), "ID").read_only();
        let mut foreign = CommittedObject::new_attribute(DocumentId::new(), "ID");
        let mut other_tag = CommittedObject::new_attribute(drawing.document(), "LABEL");

        drawing.commit(&mut read_only).unwrap();
        drawing.commit(&mut foreign).unwrap();
        drawing.commit(&mut other_tag).unwrap();

        assert_eq!(read_only.text, "");
        assert_eq!(foreign.text, "");
        assert_eq!(other_tag.text, "");
        // Nothing was consumed from the counter
        assert_eq!(controller.peek_next(), 1);
    }

    #[test]
    fn end_to_end_numbering_continues_past_existing_values() {
        let drawing = drawing_with(&["5"]);
        let mut controller = controller_over(&drawing, "ID");
        controller.set_enabled(true);

        let mut texts = Vec::new();
        for _ in 0..3 {
            let mut object = CommittedObject::new_attribute(drawing.document(), "id");
            drawing.commit(&mut object).unwrap();
            texts.push(object.text);
        }
        assert_eq!(texts, vec!["6", "7", "8"]);
    }

    #[test]
    fn disabled_controller_leaves_commits_alone() {
        let drawing = drawing_with(&["5"]);
        let mut controller = controller_over(&drawing, "ID");
        controller.set_enabled(true);
        controller.set_enabled(false);

        let mut object = CommittedObject::new_attribute(drawing.document(), "ID");
        drawing.commit(&mut object).unwrap();
        assert_eq!(object.text, "");
    }

    #[test]
    fn override_jumps_the_sequence() {
        let drawing = drawing_with(&["9"]);
        let mut controller = controller_over(&drawing, "ID");
        controller.set_next(50);
        controller.set_enabled(true);

        let mut object = CommittedObject::new_attribute(drawing.document(), "ID");
        drawing.commit(&mut object).unwrap();
        assert_eq!(object.text, "50");
        assert_eq!(controller.peek_next(), 51);
    }
}
