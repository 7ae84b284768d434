//! The `OptionRecord` and its builder.
//!
//! An `OptionRecord` is the validated set of choices for one generation
//! pass. Data-access `auto` is resolved in `build()`; a built record only
//! ever holds a concrete technology (or none, when there is no backend).
//!
//! Toggles are independent of each other: enabling one never changes
//! another.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::{
    capabilities,
    error::DomainError,
    value_objects::{
        DataAccess, DataAccessChoice, DemoKind, Dialect, MessagingBackend, MonitoringTool,
        PersistenceBackend, RateLimitStore,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionRecord {
    dialect: Dialect,
    persistence: PersistenceBackend,
    data_access: Option<DataAccess>,
    auth: bool,
    authorization: bool,
    roles: bool,
    example: bool,
    testing: bool,
    env_file: bool,
    api_docs: bool,
    realtime: bool,
    microservices: bool,
    demo: DemoKind,
    messaging: BTreeSet<MessagingBackend>,
    monitoring: BTreeSet<MonitoringTool>,
    rate_limit: Option<RateLimitStore>,
}

impl OptionRecord {
    pub fn builder() -> OptionRecordBuilder {
        OptionRecordBuilder::default()
    }

    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub const fn persistence(&self) -> PersistenceBackend {
        self.persistence
    }

    /// The resolved technology. `None` iff the backend is `none`.
    pub const fn data_access(&self) -> Option<DataAccess> {
        self.data_access
    }

    pub const fn auth(&self) -> bool {
        self.auth
    }

    pub const fn authorization(&self) -> bool {
        self.authorization
    }

    pub const fn roles(&self) -> bool {
        self.roles
    }

    pub const fn example(&self) -> bool {
        self.example
    }

    pub const fn testing(&self) -> bool {
        self.testing
    }

    pub const fn env_file(&self) -> bool {
        self.env_file
    }

    pub const fn api_docs(&self) -> bool {
        self.api_docs
    }

    pub const fn realtime(&self) -> bool {
        self.realtime
    }

    pub const fn microservices(&self) -> bool {
        self.microservices
    }

    pub const fn demo(&self) -> DemoKind {
        self.demo
    }

    pub fn messaging(&self) -> &BTreeSet<MessagingBackend> {
        &self.messaging
    }

    pub fn monitoring(&self) -> &BTreeSet<MonitoringTool> {
        &self.monitoring
    }

    pub const fn rate_limit(&self) -> Option<RateLimitStore> {
        self.rate_limit
    }

    /// Same choices rendered for another dialect.
    ///
    /// Used when the dialect is resolved from an existing project.
    pub fn with_dialect(&self, dialect: Dialect) -> Self {
        Self {
            dialect,
            ..self.clone()
        }
    }
}

impl Default for OptionRecord {
    fn default() -> Self {
        Self {
            dialect: Dialect::Typed,
            persistence: PersistenceBackend::None,
            data_access: None,
            auth: false,
            authorization: false,
            roles: false,
            example: false,
            testing: false,
            env_file: false,
            api_docs: false,
            realtime: false,
            microservices: false,
            demo: DemoKind::None,
            messaging: BTreeSet::new(),
            monitoring: BTreeSet::new(),
            rate_limit: None,
        }
    }
}

/// Fluent builder for [`OptionRecord`].
///
/// Every setter is infallible; cross-field validation happens in `build()`.
#[derive(Debug, Clone, Default)]
pub struct OptionRecordBuilder {
    record: OptionRecord,
    data_access: DataAccessChoice,
}

impl OptionRecordBuilder {
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.record.dialect = dialect;
        self
    }

    pub fn persistence(mut self, backend: PersistenceBackend) -> Self {
        self.record.persistence = backend;
        self
    }

    pub fn data_access(mut self, choice: DataAccessChoice) -> Self {
        self.data_access = choice;
        self
    }

    pub fn auth(mut self, enabled: bool) -> Self {
        self.record.auth = enabled;
        self
    }

    pub fn authorization(mut self, enabled: bool) -> Self {
        self.record.authorization = enabled;
        self
    }

    pub fn roles(mut self, enabled: bool) -> Self {
        self.record.roles = enabled;
        self
    }

    pub fn example(mut self, enabled: bool) -> Self {
        self.record.example = enabled;
        self
    }

    pub fn testing(mut self, enabled: bool) -> Self {
        self.record.testing = enabled;
        self
    }

    pub fn env_file(mut self, enabled: bool) -> Self {
        self.record.env_file = enabled;
        self
    }

    pub fn api_docs(mut self, enabled: bool) -> Self {
        self.record.api_docs = enabled;
        self
    }

    pub fn realtime(mut self, enabled: bool) -> Self {
        self.record.realtime = enabled;
        self
    }

    pub fn microservices(mut self, enabled: bool) -> Self {
        self.record.microservices = enabled;
        self
    }

    pub fn demo(mut self, demo: DemoKind) -> Self {
        self.record.demo = demo;
        self
    }

    pub fn messaging(mut self, backends: impl IntoIterator<Item = MessagingBackend>) -> Self {
        self.record.messaging = backends.into_iter().collect();
        self
    }

    pub fn monitoring(mut self, tools: impl IntoIterator<Item = MonitoringTool>) -> Self {
        self.record.monitoring = tools.into_iter().collect();
        self
    }

    pub fn rate_limit(mut self, store: Option<RateLimitStore>) -> Self {
        self.record.rate_limit = store;
        self
    }

    /// Resolve `auto`, validate the data-access pairing, and freeze.
    pub fn build(self) -> Result<OptionRecord, DomainError> {
        let mut record = self.record;
        let backend = record.persistence;

        record.data_access = match self.data_access {
            DataAccessChoice::Auto => capabilities::infer_data_access(backend),
            DataAccessChoice::Explicit(tech) => {
                capabilities::validate_data_access(tech, backend).map_err(|reason| {
                    DomainError::IncompatibleDataAccess {
                        data_access: tech.to_string(),
                        backend: backend.to_string(),
                        reason,
                    }
                })?;
                Some(tech)
            }
        };

        Ok(record)
    }
}
