//! Managing the resume file selection.
//!
//! The manager is stateless between events apart from its identity source: every operation starts
//! from the set the form currently publishes and produces a brand new [`FileSelectionSet`].

use uuid::Uuid;

use crate::domain::model::{FileId, FilePayload, FileSelectionSet, SelectedFile};

/// Source of fresh selection identities.
pub trait IdentityGenerator {
    fn next_id(&mut self) -> FileId;
}

/// Random v4 UUID identities.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdentities;

impl IdentityGenerator for UuidIdentities {
    fn next_id(&mut self) -> FileId {
        FileId::new(Uuid::new_v4().to_string())
    }
}

/// Deterministic `file-1`, `file-2`, ... identities for tests and reproducible output.
#[derive(Debug, Clone)]
pub struct SequentialIdentities {
    prefix: String,
    next: u64,
}

impl SequentialIdentities {
    pub fn new<S: Into<String>>(prefix: S) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIdentities {
    fn default() -> Self {
        Self::new("file")
    }
}

impl IdentityGenerator for SequentialIdentities {
    fn next_id(&mut self) -> FileId {
        let id = FileId::new(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

/// Holder of the published resume value.
///
/// Setting a new value is expected to trigger validation of the field.
pub trait ResumeField {
    fn current_resume(&self) -> Option<&FileSelectionSet>;
    fn publish_resume(&mut self, set: FileSelectionSet);
}

/// Translates "files selected" and "file removed" events into new selection sets.
#[derive(Debug, Default, Clone)]
pub struct FileSelectionManager<G = UuidIdentities> {
    ids: G,
}

impl FileSelectionManager<UuidIdentities> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<G: IdentityGenerator> FileSelectionManager<G> {
    pub fn with_identities(ids: G) -> Self {
        Self { ids }
    }

    /// Carry `current` forward and append `batch`, each new file under a fresh identity.
    pub fn on_files_added<I>(
        &mut self,
        current: Option<&FileSelectionSet>,
        batch: I,
    ) -> FileSelectionSet
    where
        I: IntoIterator<Item = FilePayload>,
    {
        let batch = batch.into_iter();
        let carried = current.map(FileSelectionSet::len).unwrap_or(0);
        let mut entries = Vec::with_capacity(carried + batch.size_hint().0);
        if let Some(current) = current {
            entries.extend(current.iter().cloned());
        }
        for payload in batch {
            entries.push(SelectedFile {
                identity: self.ids.next_id(),
                payload,
            });
        }
        tracing::debug!(
            carried,
            added = entries.len() - carried,
            "rebuilt resume selection"
        );
        FileSelectionSet::from_entries(entries)
    }

    /// Drop the entry carrying `identity`. Unknown identities leave the set unchanged.
    pub fn on_file_removed(
        &self,
        current: Option<&FileSelectionSet>,
        identity: &FileId,
    ) -> FileSelectionSet {
        let Some(current) = current else {
            return FileSelectionSet::new();
        };
        match current.position(identity) {
            Some(index) => {
                let entries = current
                    .iter()
                    .enumerate()
                    .filter(|(position, _)| *position != index)
                    .map(|(_, entry)| entry.clone())
                    .collect();
                tracing::debug!(%identity, remaining = current.len() - 1, "removed resume file");
                FileSelectionSet::from_entries(entries)
            }
            None => {
                tracing::debug!(%identity, "ignoring removal of unknown resume file");
                current.clone()
            }
        }
    }

    /// Merge `batch` into the form's resume value and publish the result.
    ///
    /// Returns the identities assigned to the new files, in batch order.
    pub fn add_files<F, I>(&mut self, form: &mut F, batch: I) -> Vec<FileId>
    where
        F: ResumeField + ?Sized,
        I: IntoIterator<Item = FilePayload>,
    {
        let carried = form.current_resume().map(FileSelectionSet::len).unwrap_or(0);
        let next = self.on_files_added(form.current_resume(), batch);
        let assigned = next.entries()[carried..]
            .iter()
            .map(|entry| entry.identity.clone())
            .collect();
        form.publish_resume(next);
        assigned
    }

    /// Remove one file from the form's resume value. Returns `false` for a stale identity, in
    /// which case nothing is published.
    pub fn remove_file<F>(&self, form: &mut F, identity: &FileId) -> bool
    where
        F: ResumeField + ?Sized,
    {
        let present = form
            .current_resume()
            .is_some_and(|current| current.contains(identity));
        if !present {
            return false;
        }
        let next = self.on_file_removed(form.current_resume(), identity);
        form.publish_resume(next);
        true
    }
}

/// One entry of the removable badge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge<'a> {
    pub identity: &'a FileId,
    pub display_name: &'a str,
}

/// Lazy, restartable projection of a selection set for the badge list.
#[derive(Debug, Clone)]
pub struct Badges<'a> {
    inner: std::slice::Iter<'a, SelectedFile>,
}

impl<'a> Iterator for Badges<'a> {
    type Item = Badge<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| Badge {
            identity: &entry.identity,
            display_name: entry.display_name(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Badges<'_> {}

/// Project `current` into `(identity, display name)` badges in selection order.
pub fn render(current: Option<&FileSelectionSet>) -> Badges<'_> {
    Badges {
        inner: current.map(|set| set.entries()).unwrap_or(&[]).iter(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;
    use std::path::PathBuf;

    fn payload(name: &str) -> FilePayload {
        FilePayload {
            name: name.into(),
            mime_type: "application/pdf".into(),
            size: 42,
            handle: PathBuf::from(format!("/tmp/{name}")),
        }
    }

    fn names(set: &FileSelectionSet) -> Vec<&str> {
        set.iter().map(SelectedFile::display_name).collect()
    }

    #[derive(Default)]
    struct Holder {
        value: Option<FileSelectionSet>,
        publishes: usize,
    }

    impl ResumeField for Holder {
        fn current_resume(&self) -> Option<&FileSelectionSet> {
            self.value.as_ref()
        }

        fn publish_resume(&mut self, set: FileSelectionSet) {
            self.value = Some(set);
            self.publishes += 1;
        }
    }

    #[test]
    fn batch_add_preserves_reported_order_with_distinct_identities() {
        let mut manager = FileSelectionManager::new();
        let set = manager.on_files_added(None, ["a.pdf", "b.pdf", "c.pdf"].map(payload));

        assert_eq!(names(&set), ["a.pdf", "b.pdf", "c.pdf"]);
        let ids: HashSet<_> = set.iter().map(|entry| &entry.identity).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn later_batches_append_after_carried_entries() {
        let mut manager = FileSelectionManager::with_identities(SequentialIdentities::default());
        let first = manager.on_files_added(None, [payload("a.pdf")]);
        let second = manager.on_files_added(Some(&first), [payload("b.pdf"), payload("c.pdf")]);

        assert_eq!(names(&second), ["a.pdf", "b.pdf", "c.pdf"]);
        assert_eq!(second.entries()[0], first.entries()[0]);
        assert_eq!(second.entries()[2].identity, FileId::new("file-3"));
    }

    #[test]
    fn removal_keeps_other_entries_in_order() {
        let mut manager = FileSelectionManager::with_identities(SequentialIdentities::default());
        let set = manager.on_files_added(None, ["a.pdf", "b.pdf", "c.pdf"].map(payload));
        let middle = set.entries()[1].identity.clone();

        let next = manager.on_file_removed(Some(&set), &middle);
        assert_eq!(names(&next), ["a.pdf", "c.pdf"]);
        assert!(!next.contains(&middle));
    }

    #[test]
    fn removing_unknown_identity_is_a_noop() {
        let mut manager = FileSelectionManager::new();
        let set = manager.on_files_added(None, [payload("a.pdf")]);

        let next = manager.on_file_removed(Some(&set), &FileId::new("stale"));
        assert_eq!(next, set);
        assert!(manager.on_file_removed(None, &FileId::new("stale")).is_empty());
    }

    #[test]
    fn removing_last_file_renders_nothing() {
        let mut manager = FileSelectionManager::new();
        let set = manager.on_files_added(None, [payload("a.pdf")]);
        let only = set.entries()[0].identity.clone();

        let next = manager.on_file_removed(Some(&set), &only);
        assert!(next.is_empty());
        assert_eq!(render(Some(&next)).count(), 0);
    }

    #[test]
    fn duplicate_content_in_one_batch_is_tracked_separately() {
        let mut manager = FileSelectionManager::new();
        let set = manager.on_files_added(None, [payload("cv.pdf"), payload("cv.pdf")]);
        assert_eq!(set.len(), 2);
        let first = set.entries()[0].identity.clone();
        let second = set.entries()[1].identity.clone();
        assert_ne!(first, second);

        let next = manager.on_file_removed(Some(&set), &first);
        assert_eq!(next.len(), 1);
        assert_eq!(next.entries()[0].identity, second);
    }

    #[test]
    fn readding_after_removal_gets_a_new_identity() {
        let mut manager = FileSelectionManager::with_identities(SequentialIdentities::default());
        let set = manager.on_files_added(None, [payload("cv.pdf")]);
        let first_id = set.entries()[0].identity.clone();
        let emptied = manager.on_file_removed(Some(&set), &first_id);

        let readded = manager.on_files_added(Some(&emptied), [payload("cv.pdf")]);
        assert_ne!(readded.entries()[0].identity, first_id);
    }

    #[test]
    fn mixed_event_sequence_keeps_surviving_entries_in_order() {
        let mut manager = FileSelectionManager::new();
        let mut holder = Holder::default();

        let first = manager.add_files(&mut holder, ["a", "b", "c"].map(payload));
        manager.remove_file(&mut holder, &first[0]);
        let second = manager.add_files(&mut holder, ["d", "e"].map(payload));
        manager.remove_file(&mut holder, &second[1]);
        manager.remove_file(&mut holder, &first[2]);

        let value = holder.value.as_ref().unwrap();
        assert_eq!(names(value), ["b", "d"]);
        let ids: HashSet<_> = value.iter().map(|entry| &entry.identity).collect();
        assert_eq!(ids.len(), value.len());
    }

    #[test]
    fn publishing_variants_only_publish_real_changes() {
        let mut manager = FileSelectionManager::new();
        let mut holder = Holder::default();

        let ids = manager.add_files(&mut holder, [payload("a.pdf")]);
        assert_eq!(holder.publishes, 1);
        assert!(!manager.remove_file(&mut holder, &FileId::new("stale")));
        assert_eq!(holder.publishes, 1);
        assert!(manager.remove_file(&mut holder, &ids[0]));
        assert_eq!(holder.publishes, 2);
        assert!(holder.value.as_ref().unwrap().is_empty());
    }

    #[test]
    fn render_is_restartable_and_ordered() {
        let mut manager = FileSelectionManager::with_identities(SequentialIdentities::new("cv"));
        let set = manager.on_files_added(None, ["a.pdf", "b.png"].map(payload));

        let badges = render(Some(&set));
        let first: Vec<_> = badges.clone().map(|badge| badge.display_name).collect();
        let second: Vec<_> = badges
            .map(|badge| (badge.identity.as_str(), badge.display_name))
            .collect();
        assert_eq!(first, ["a.pdf", "b.png"]);
        assert_eq!(second, [("cv-1", "a.pdf"), ("cv-2", "b.png")]);
        assert_eq!(render(None).len(), 0);
    }
}
