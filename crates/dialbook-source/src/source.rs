use crate::Result;
use dialbook_core::{AccessOutcome, PermissionStatus, RawContactRecord};
use std::io::ErrorKind;
use std::path::Path;

/// The platform contact store.
///
/// `fetch_contacts` is only called after `request_permission` returned
/// [`PermissionStatus::Granted`].
#[allow(async_fn_in_trait)]
pub trait ContactStore {
    fn source_name(&self) -> &'static str;
    async fn request_permission(&self) -> Result<PermissionStatus>;
    async fn fetch_contacts(&self) -> Result<Vec<RawContactRecord>>;
}

/// Asks for permission and, when granted, fetches every raw record.
pub async fn request_access<S: ContactStore>(store: &S) -> Result<AccessOutcome> {
    match store.request_permission().await? {
        PermissionStatus::Granted => Ok(AccessOutcome::Granted(store.fetch_contacts().await?)),
        PermissionStatus::Denied => Ok(AccessOutcome::Denied),
        PermissionStatus::Undetermined => Ok(AccessOutcome::Undetermined),
    }
}

/// Maps the readability of a contacts file onto a permission status: a
/// missing file has not been set up yet, an unreadable one is denied.
pub(crate) async fn file_permission(path: &Path) -> Result<PermissionStatus> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_dir() => return Ok(PermissionStatus::Undetermined),
        Ok(_) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Ok(PermissionStatus::Undetermined)
        }
        Err(err) if err.kind() == ErrorKind::PermissionDenied => {
            return Ok(PermissionStatus::Denied)
        }
        Err(err) => return Err(err.into()),
    }

    match tokio::fs::File::open(path).await {
        Ok(_) => Ok(PermissionStatus::Granted),
        Err(err) if err.kind() == ErrorKind::PermissionDenied => Ok(PermissionStatus::Denied),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::{file_permission, request_access, ContactStore};
    use crate::Result;
    use dialbook_core::{AccessOutcome, PermissionStatus, RawContactRecord};
    use std::cell::Cell;
    use tempfile::TempDir;

    struct FakeStore {
        status: PermissionStatus,
        fetched: Cell<bool>,
    }

    impl ContactStore for FakeStore {
        fn source_name(&self) -> &'static str {
            "fake"
        }

        async fn request_permission(&self) -> Result<PermissionStatus> {
            Ok(self.status)
        }

        async fn fetch_contacts(&self) -> Result<Vec<RawContactRecord>> {
            self.fetched.set(true);
            Ok(vec![RawContactRecord {
                id: Some("1".to_string()),
                ..RawContactRecord::default()
            }])
        }
    }

    fn fake(status: PermissionStatus) -> FakeStore {
        FakeStore {
            status,
            fetched: Cell::new(false),
        }
    }

    #[tokio::test]
    async fn granted_fetches_records() {
        let store = fake(PermissionStatus::Granted);
        let outcome = request_access(&store).await.expect("access");
        assert!(store.fetched.get());
        match outcome {
            AccessOutcome::Granted(records) => assert_eq!(records.len(), 1),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn denied_never_fetches() {
        let store = fake(PermissionStatus::Denied);
        let outcome = request_access(&store).await.expect("access");
        assert_eq!(outcome, AccessOutcome::Denied);
        assert!(!store.fetched.get());

        let store = fake(PermissionStatus::Undetermined);
        let outcome = request_access(&store).await.expect("access");
        assert_eq!(outcome, AccessOutcome::Undetermined);
        assert!(!store.fetched.get());
    }

    #[tokio::test]
    async fn file_permission_maps_missing_and_present_files() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("contacts.vcf");
        assert_eq!(
            file_permission(&missing).await.expect("status"),
            PermissionStatus::Undetermined
        );

        std::fs::write(&missing, "").expect("write");
        assert_eq!(
            file_permission(&missing).await.expect("status"),
            PermissionStatus::Granted
        );

        assert_eq!(
            file_permission(temp.path()).await.expect("status"),
            PermissionStatus::Undetermined
        );
    }
}
