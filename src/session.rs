//! Session state machine
//!
//! Tracks connection status, the selected bucket, its cached listing, and the
//! pending-delete confirmation. Transition methods mutate the `Session` value
//! and return the storage `Effect` the caller must perform; results of those
//! external calls are fed back through the `on_*` methods. The module itself
//! never touches the network, so every transition is unit-testable.

use crate::config::ConnectionConfig;
use crate::naming::{validate_bucket_name, NameError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("not connected")]
    NotConnected,

    #[error("already connected; disconnect first")]
    AlreadyConnected,

    #[error("a connection attempt is already in progress")]
    ConnectInProgress,

    #[error("no bucket selected")]
    NoBucketSelected,

    #[error("no file selected for deletion")]
    NoDeleteTarget,

    #[error("deletion has not been confirmed")]
    DeleteNotConfirmed,

    #[error("invalid bucket name: {0}")]
    InvalidName(#[from] NameError),
}

/// Connection phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// An external storage call the caller must perform on behalf of the session.
///
/// Effects are plain values; performing them and feeding the outcome back is
/// the driver's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Authenticate and list buckets
    ListBuckets,
    /// Create a bucket (name already validated locally)
    CreateBucket { name: String },
    /// List object keys in a bucket
    ListObjects { bucket: String },
    /// Upload a local file to a bucket
    Upload {
        bucket: String,
        key: String,
        source: PathBuf,
    },
    /// Download an object to a local path
    Download {
        bucket: String,
        key: String,
        dest: PathBuf,
    },
    /// Delete an object
    DeleteObject { bucket: String, key: String },
}

/// The full session state.
///
/// Starts empty, is mutated by user actions, and resets to the identical
/// empty value on disconnect. Credentials live inside `config` and are
/// dropped with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    phase: Phase,
    config: Option<ConnectionConfig>,
    buckets: Vec<String>,
    current_bucket: Option<String>,
    files: Vec<String>,
    pending_delete: Option<String>,
    delete_confirmed: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.phase == Phase::Connected
    }

    pub fn config(&self) -> Option<&ConnectionConfig> {
        self.config.as_ref()
    }

    pub fn buckets(&self) -> &[String] {
        &self.buckets
    }

    pub fn current_bucket(&self) -> Option<&str> {
        self.current_bucket.as_deref()
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn delete_confirmed(&self) -> bool {
        self.delete_confirmed
    }

    /// Begin a connection attempt with the given config.
    ///
    /// Legal only while disconnected. The config is held provisionally; it
    /// becomes the session config on `on_connected` and is discarded on
    /// `on_connect_failed`.
    pub fn connect(&mut self, config: ConnectionConfig) -> Result<Effect, SessionError> {
        match self.phase {
            Phase::Connected => return Err(SessionError::AlreadyConnected),
            Phase::Connecting => return Err(SessionError::ConnectInProgress),
            Phase::Disconnected => {}
        }

        self.phase = Phase::Connecting;
        self.config = Some(config);
        Ok(Effect::ListBuckets)
    }

    /// The authenticate-and-list-buckets call succeeded.
    pub fn on_connected(&mut self, buckets: Vec<String>) {
        self.phase = Phase::Connected;
        self.buckets = buckets;
    }

    /// The connection attempt failed; discard the provisional config.
    pub fn on_connect_failed(&mut self) {
        *self = Self::default();
    }

    /// Drop the connection and reset every field, unconditionally.
    pub fn disconnect(&mut self) {
        *self = Self::default();
    }

    /// Select a bucket to work in. Triggers a listing of its objects.
    pub fn select_bucket(&mut self, name: &str) -> Result<Effect, SessionError> {
        if !self.is_connected() {
            return Err(SessionError::NotConnected);
        }

        self.current_bucket = Some(name.to_string());
        self.files.clear();
        self.pending_delete = None;
        self.delete_confirmed = false;
        Ok(Effect::ListObjects {
            bucket: name.to_string(),
        })
    }

    /// A listing completed; replace the cached file list.
    pub fn on_objects_listed(&mut self, files: Vec<String>) {
        self.files = files;
    }

    /// A listing failed. The selection is reverted so a failed selection is
    /// never mistaken for an empty bucket.
    pub fn on_list_failed(&mut self) {
        self.current_bucket = None;
        self.files.clear();
        self.pending_delete = None;
        self.delete_confirmed = false;
    }

    /// Request creation of a new bucket.
    ///
    /// The name is validated locally first; an invalid name produces no
    /// effect and leaves the session untouched.
    pub fn create_bucket(&mut self, name: &str) -> Result<Effect, SessionError> {
        if !self.is_connected() {
            return Err(SessionError::NotConnected);
        }

        validate_bucket_name(name)?;

        Ok(Effect::CreateBucket {
            name: name.to_string(),
        })
    }

    /// A bucket was created; record it in the known bucket list.
    pub fn on_bucket_created(&mut self, name: &str) {
        if !self.buckets.iter().any(|b| b == name) {
            self.buckets.push(name.to_string());
        }
    }

    /// Mark a file as the pending delete target.
    ///
    /// Changing the target resets the confirmation flag.
    pub fn select_delete_target(&mut self, name: &str) -> Result<(), SessionError> {
        if self.current_bucket.is_none() {
            return Err(SessionError::NoBucketSelected);
        }

        if self.pending_delete.as_deref() != Some(name) {
            self.delete_confirmed = false;
        }
        self.pending_delete = Some(name.to_string());
        Ok(())
    }

    /// Set or clear the delete confirmation flag.
    pub fn set_delete_confirmed(&mut self, confirmed: bool) -> Result<(), SessionError> {
        if self.pending_delete.is_none() {
            return Err(SessionError::NoDeleteTarget);
        }

        self.delete_confirmed = confirmed;
        Ok(())
    }

    /// Delete the pending target. Legal only after explicit confirmation;
    /// an unconfirmed call is rejected without producing any effect.
    pub fn delete_file(&mut self) -> Result<Effect, SessionError> {
        let bucket = self
            .current_bucket
            .clone()
            .ok_or(SessionError::NoBucketSelected)?;
        let key = self
            .pending_delete
            .clone()
            .ok_or(SessionError::NoDeleteTarget)?;

        if !self.delete_confirmed {
            return Err(SessionError::DeleteNotConfirmed);
        }

        Ok(Effect::DeleteObject { bucket, key })
    }

    /// The delete call succeeded; drop the key locally and clear the
    /// confirmation state.
    pub fn on_file_deleted(&mut self) {
        if let Some(key) = self.pending_delete.take() {
            self.files.retain(|f| f != &key);
        }
        self.delete_confirmed = false;
    }

    /// Re-fetch the current bucket's listing unconditionally.
    pub fn refresh_files(&mut self) -> Result<Effect, SessionError> {
        let bucket = self
            .current_bucket
            .clone()
            .ok_or(SessionError::NoBucketSelected)?;

        Ok(Effect::ListObjects { bucket })
    }

    /// Upload a local file into the current bucket under the given key.
    pub fn upload_file(&mut self, source: PathBuf, key: &str) -> Result<Effect, SessionError> {
        let bucket = self
            .current_bucket
            .clone()
            .ok_or(SessionError::NoBucketSelected)?;

        Ok(Effect::Upload {
            bucket,
            key: key.to_string(),
            source,
        })
    }

    /// An upload finished; refresh the listing to pick up the new key.
    pub fn on_uploaded(&mut self) -> Result<Effect, SessionError> {
        self.refresh_files()
    }

    /// Download an object from the current bucket. Pure side effect; no
    /// completion feedback is needed.
    pub fn download_file(&mut self, key: &str, dest: PathBuf) -> Result<Effect, SessionError> {
        let bucket = self
            .current_bucket
            .clone()
            .ok_or(SessionError::NoBucketSelected)?;

        Ok(Effect::Download {
            bucket,
            key: key.to_string(),
            dest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Provider;

    fn test_config() -> ConnectionConfig {
        ConnectionConfig {
            provider: Provider::Aws,
            endpoint: "https://s3.amazonaws.com".to_string(),
            region: "us-east-1".to_string(),
            access_key_id: "AKIATEST".to_string(),
            secret_access_key: "secret".to_string(),
        }
    }

    /// A session that has connected and landed in Connected/NoBucketSelected.
    fn connected_session(buckets: &[&str]) -> Session {
        let mut session = Session::new();
        session.connect(test_config()).unwrap();
        session.on_connected(buckets.iter().map(|s| s.to_string()).collect());
        session
    }

    #[test]
    fn test_initial_state_is_empty() {
        let session = Session::new();
        assert!(!session.is_connected());
        assert!(session.config().is_none());
        assert!(session.buckets().is_empty());
        assert!(session.current_bucket().is_none());
        assert!(session.files().is_empty());
        assert!(session.pending_delete().is_none());
        assert!(!session.delete_confirmed());
    }

    #[test]
    fn test_connect_produces_list_buckets_effect() {
        let mut session = Session::new();
        let effect = session.connect(test_config()).unwrap();
        assert_eq!(effect, Effect::ListBuckets);
        // Connecting, not yet connected
        assert!(!session.is_connected());
    }

    #[test]
    fn test_connect_success_populates_buckets() {
        let session = connected_session(&["a", "b"]);
        assert!(session.is_connected());
        assert!(session.config().is_some());
        assert_eq!(session.buckets(), &["a", "b"]);
    }

    #[test]
    fn test_connect_failure_discards_config() {
        let mut session = Session::new();
        session.connect(test_config()).unwrap();
        session.on_connect_failed();
        assert_eq!(session, Session::new());
    }

    #[test]
    fn test_connect_twice_rejected() {
        let mut session = connected_session(&[]);
        assert_eq!(
            session.connect(test_config()),
            Err(SessionError::AlreadyConnected)
        );

        let mut session = Session::new();
        session.connect(test_config()).unwrap();
        assert_eq!(
            session.connect(test_config()),
            Err(SessionError::ConnectInProgress)
        );
    }

    #[test]
    fn test_disconnect_resets_from_any_state() {
        // From deep in a session with selection and pending delete
        let mut session = connected_session(&["a"]);
        session.select_bucket("a").unwrap();
        session.on_objects_listed(vec!["f1.txt".to_string()]);
        session.select_delete_target("f1.txt").unwrap();
        session.set_delete_confirmed(true).unwrap();

        session.disconnect();
        assert_eq!(session, Session::new());

        // From mid-connect
        let mut session = Session::new();
        session.connect(test_config()).unwrap();
        session.disconnect();
        assert_eq!(session, Session::new());

        // Disconnect while disconnected is a no-op
        let mut session = Session::new();
        session.disconnect();
        assert_eq!(session, Session::new());
    }

    #[test]
    fn test_select_bucket_requires_connection() {
        let mut session = Session::new();
        assert_eq!(
            session.select_bucket("a"),
            Err(SessionError::NotConnected)
        );
    }

    #[test]
    fn test_select_bucket_lists_objects() {
        let mut session = connected_session(&["a", "b"]);
        let effect = session.select_bucket("a").unwrap();
        assert_eq!(
            effect,
            Effect::ListObjects {
                bucket: "a".to_string()
            }
        );

        session.on_objects_listed(vec!["f1.txt".to_string()]);
        assert_eq!(session.current_bucket(), Some("a"));
        assert_eq!(session.files(), &["f1.txt"]);
    }

    #[test]
    fn test_select_bucket_resets_delete_state() {
        let mut session = connected_session(&["a", "b"]);
        session.select_bucket("a").unwrap();
        session.on_objects_listed(vec!["f1.txt".to_string()]);
        session.select_delete_target("f1.txt").unwrap();
        session.set_delete_confirmed(true).unwrap();

        session.select_bucket("b").unwrap();
        assert!(session.pending_delete().is_none());
        assert!(!session.delete_confirmed());
        assert!(session.files().is_empty());
    }

    #[test]
    fn test_list_failure_reverts_selection() {
        let mut session = connected_session(&["a"]);
        session.select_bucket("a").unwrap();
        session.on_list_failed();

        // A failed selection must not look like an empty bucket
        assert!(session.current_bucket().is_none());
        assert!(session.files().is_empty());
        assert!(session.is_connected());
    }

    #[test]
    fn test_create_bucket_validates_locally() {
        let mut session = connected_session(&["a"]);
        let before = session.clone();

        let result = session.create_bucket("UPPER");
        assert_eq!(
            result,
            Err(SessionError::InvalidName(NameError::Charset))
        );
        // No effect produced, state untouched
        assert_eq!(session, before);
    }

    #[test]
    fn test_create_bucket_effect_and_completion() {
        let mut session = connected_session(&["a"]);
        let effect = session.create_bucket("new-bucket").unwrap();
        assert_eq!(
            effect,
            Effect::CreateBucket {
                name: "new-bucket".to_string()
            }
        );

        session.on_bucket_created("new-bucket");
        assert_eq!(session.buckets(), &["a", "new-bucket"]);

        // Creating a name we already know does not duplicate it
        session.on_bucket_created("new-bucket");
        assert_eq!(session.buckets(), &["a", "new-bucket"]);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut session = connected_session(&["a"]);
        session.select_bucket("a").unwrap();
        session.on_objects_listed(vec!["f1.txt".to_string()]);
        session.select_delete_target("f1.txt").unwrap();

        let before = session.clone();
        assert_eq!(session.delete_file(), Err(SessionError::DeleteNotConfirmed));
        assert_eq!(session, before);
    }

    #[test]
    fn test_changing_delete_target_resets_confirmation() {
        let mut session = connected_session(&["a"]);
        session.select_bucket("a").unwrap();
        session.on_objects_listed(vec!["f1.txt".to_string(), "f2.txt".to_string()]);

        session.select_delete_target("f1.txt").unwrap();
        session.set_delete_confirmed(true).unwrap();
        assert!(session.delete_confirmed());

        session.select_delete_target("f2.txt").unwrap();
        assert!(!session.delete_confirmed());

        // Re-selecting the same target keeps the flag
        session.set_delete_confirmed(true).unwrap();
        session.select_delete_target("f2.txt").unwrap();
        assert!(session.delete_confirmed());
    }

    #[test]
    fn test_confirmed_delete_full_flow() {
        let mut session = connected_session(&["a", "b"]);
        session.select_bucket("a").unwrap();
        session.on_objects_listed(vec!["f1.txt".to_string()]);

        // Unconfirmed delete: no effect, no state change
        session.select_delete_target("f1.txt").unwrap();
        assert!(session.delete_file().is_err());
        assert_eq!(session.files(), &["f1.txt"]);

        session.set_delete_confirmed(true).unwrap();
        let effect = session.delete_file().unwrap();
        assert_eq!(
            effect,
            Effect::DeleteObject {
                bucket: "a".to_string(),
                key: "f1.txt".to_string()
            }
        );

        session.on_file_deleted();
        assert!(session.files().is_empty());
        assert!(session.pending_delete().is_none());
        assert!(!session.delete_confirmed());
    }

    #[test]
    fn test_delete_failure_leaves_state_unchanged() {
        let mut session = connected_session(&["a"]);
        session.select_bucket("a").unwrap();
        session.on_objects_listed(vec!["f1.txt".to_string()]);
        session.select_delete_target("f1.txt").unwrap();
        session.set_delete_confirmed(true).unwrap();
        session.delete_file().unwrap();

        // Driver reports failure by simply not calling on_file_deleted
        assert_eq!(session.files(), &["f1.txt"]);
        assert_eq!(session.pending_delete(), Some("f1.txt"));
    }

    #[test]
    fn test_refresh_and_upload_effects() {
        let mut session = connected_session(&["a"]);
        session.select_bucket("a").unwrap();
        session.on_objects_listed(vec![]);

        let effect = session
            .upload_file(PathBuf::from("/tmp/report.pdf"), "report.pdf")
            .unwrap();
        assert_eq!(
            effect,
            Effect::Upload {
                bucket: "a".to_string(),
                key: "report.pdf".to_string(),
                source: PathBuf::from("/tmp/report.pdf"),
            }
        );

        // Completion asks for a refresh
        let refresh = session.on_uploaded().unwrap();
        assert_eq!(
            refresh,
            Effect::ListObjects {
                bucket: "a".to_string()
            }
        );
    }

    #[test]
    fn test_download_has_no_state_effect() {
        let mut session = connected_session(&["a"]);
        session.select_bucket("a").unwrap();
        session.on_objects_listed(vec!["f1.txt".to_string()]);

        let before = session.clone();
        let effect = session
            .download_file("f1.txt", PathBuf::from("/tmp/out/f1.txt"))
            .unwrap();
        assert_eq!(
            effect,
            Effect::Download {
                bucket: "a".to_string(),
                key: "f1.txt".to_string(),
                dest: PathBuf::from("/tmp/out/f1.txt"),
            }
        );
        assert_eq!(session, before);
    }

    #[test]
    fn test_file_operations_require_selection() {
        let mut session = connected_session(&["a"]);

        assert_eq!(session.refresh_files(), Err(SessionError::NoBucketSelected));
        assert_eq!(
            session.upload_file(PathBuf::from("/tmp/x"), "x"),
            Err(SessionError::NoBucketSelected)
        );
        assert_eq!(
            session.download_file("x", PathBuf::from("/tmp/x")),
            Err(SessionError::NoBucketSelected)
        );
        assert_eq!(
            session.select_delete_target("x"),
            Err(SessionError::NoBucketSelected)
        );
        assert_eq!(
            session.set_delete_confirmed(true),
            Err(SessionError::NoDeleteTarget)
        );
    }

    #[test]
    fn test_full_scenario() {
        // connect -> buckets [a, b]; select a -> [f1.txt]; unconfirmed delete
        // is a no-op; confirm then delete -> files empty, target cleared
        let mut session = Session::new();
        assert_eq!(session.connect(test_config()).unwrap(), Effect::ListBuckets);
        session.on_connected(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(session.buckets(), &["a", "b"]);

        session.select_bucket("a").unwrap();
        session.on_objects_listed(vec!["f1.txt".to_string()]);
        assert_eq!(session.files(), &["f1.txt"]);

        session.select_delete_target("f1.txt").unwrap();
        let before = session.clone();
        assert!(session.delete_file().is_err());
        assert_eq!(session, before);

        session.set_delete_confirmed(true).unwrap();
        session.delete_file().unwrap();
        session.on_file_deleted();

        assert!(session.files().is_empty());
        assert!(session.pending_delete().is_none());
    }
}
