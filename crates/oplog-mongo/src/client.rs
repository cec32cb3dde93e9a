use std::time::Duration;

use mongodb::bson::{doc, Bson, Document};
use mongodb::error::ErrorKind;
use mongodb::options::{ClientOptions, Credential, ServerAddress, Tls, TlsOptions};
use mongodb::sync::Client;
use oplog_config::secrets::LoginCredentials;
use oplog_config::ConnectionSettings;
use oplog_reconcile::{
    size_mb_from_bytes, AdminClient, AdminError, MemberRole, ReconcileError, TopologyOracle,
};
use tracing::{debug, info};

use crate::classify::admin_error;

/// Reported to the server in the connection handshake.
pub const APP_NAME: &str = "oplog-reconcile";

const OPLOG_COLLECTION: &str = "oplog.rs";

/// Driver options for a direct connection to one member.
pub fn client_options(
    settings: &ConnectionSettings,
    credentials: Option<&LoginCredentials>,
) -> ClientOptions {
    let credential = credentials.map(|creds| {
        let mut credential = Credential::default();
        credential.username = Some(creds.user.clone());
        credential.password = Some(creds.password.clone());
        credential.source = Some(settings.login_database.clone());
        credential
    });

    let tls = settings.tls.enabled.then(|| {
        let mut tls = TlsOptions::default();
        if settings.tls.cert_reqs.allows_invalid_certificates() {
            tls.allow_invalid_certificates = Some(true);
        }
        Tls::Enabled(tls)
    });

    ClientOptions::builder()
        .hosts(vec![ServerAddress::Tcp {
            host: settings.host.clone(),
            port: Some(settings.port),
        }])
        .direct_connection(true)
        .app_name(APP_NAME.to_string())
        .server_selection_timeout(
            settings
                .server_selection_timeout_ms
                .map(Duration::from_millis),
        )
        .credential(credential)
        .tls(tls)
        .build()
}

/// Connected, authenticated handle to one replica-set member.
pub struct MongoAdminClient {
    client: Client,
}

impl std::fmt::Debug for MongoAdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoAdminClient").finish_non_exhaustive()
    }
}

/// Build the driver handle and prove the member is reachable (and that the
/// credentials are accepted) with a `ping`. The driver connects lazily, so
/// without the ping a bad host would only surface on the first real read.
pub fn connect(
    settings: &ConnectionSettings,
    credentials: Option<&LoginCredentials>,
) -> Result<MongoAdminClient, ReconcileError> {
    let options = client_options(settings, credentials);
    let client = Client::with_options(options).map_err(|e| {
        ReconcileError::connectivity(format!("Unable to connect to MongoDB: {e}"))
    })?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 }, None)
        .map_err(|e| match e.kind.as_ref() {
            ErrorKind::Authentication { .. } => ReconcileError::connectivity(format!(
                "Unable to authenticate with MongoDB: {e}"
            )),
            _ => ReconcileError::connectivity(format!("Unable to connect to MongoDB: {e}")),
        })?;

    info!(
        host = %settings.host,
        port = settings.port,
        authenticated = credentials.is_some(),
        tls = settings.tls.enabled,
        "connected to member"
    );
    Ok(MongoAdminClient { client })
}

impl MongoAdminClient {
    fn run(&self, db: &str, command: Document) -> Result<Document, AdminError> {
        debug!(db, ?command, "run_command");
        self.client
            .database(db)
            .run_command(command, None)
            .map_err(|e| admin_error(&e))
    }
}

/// Numeric field as f64, whatever BSON width the server chose.
fn bson_number(doc: &Document, key: &str) -> Option<f64> {
    match doc.get(key)? {
        Bson::Int32(v) => Some(*v as f64),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

impl AdminClient for MongoAdminClient {
    fn oplog_size_mb(&self) -> Result<f64, AdminError> {
        let stats = self.run("local", doc! { "collStats": OPLOG_COLLECTION })?;
        let bytes = bson_number(&stats, "maxSize").ok_or_else(|| {
            AdminError::rejected("collStats on local.oplog.rs returned no numeric maxSize")
        })?;
        Ok(size_mb_from_bytes(bytes.trunc()))
    }

    fn set_oplog_size_mb(&self, size_mb: u64) -> Result<(), AdminError> {
        self.run(
            "admin",
            doc! { "replSetResizeOplog": 1, "size": size_mb as f64 },
        )?;
        Ok(())
    }

    fn compact_oplog(&self) -> Result<(), AdminError> {
        self.run("local", doc! { "compact": OPLOG_COLLECTION })?;
        Ok(())
    }
}

impl TopologyOracle for MongoAdminClient {
    fn member_role(&self) -> Result<MemberRole, AdminError> {
        let status = self.run("admin", doc! { "replSetGetStatus": 1 })?;
        let state = bson_number(&status, "myState").ok_or_else(|| {
            AdminError::rejected("replSetGetStatus returned no numeric myState")
        })?;
        Ok(MemberRole::from_state_code(state as i64))
    }
}
