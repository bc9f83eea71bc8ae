use crate::authentication::{attach_session_user, initialize_authentication};
use crate::body::json_config;
use crate::configuration::{BodySettings, Environment, SessionSettings, Settings};
use crate::cookies::{parse_cookies, CookieSigningKey};
use crate::errors::error_chain_fmt;
use crate::sessions::{initialize_session, DurableSessionStore, MissingSessionStore, SessionBackend};
use crate::telemetry::log_client_address;
use actix_session::{CookieContentSecurity, SessionLength, SessionMiddleware};
use actix_web::body::MessageBody;
use actix_web::cookie::Key;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::Compress;
use actix_web::{web, App, HttpServer};
use actix_web_lab::middleware::from_fn;
use secrecy::{ExposeSecret, Secret};
use std::fmt;
use std::io;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

/// Signing keys are derived from the secret and need at least this many bytes.
pub const MIN_SECRET_LENGTH: usize = 64;

/// Opaque to the pipeline, available to routes as `web::Data<DatabaseUrl>`.
#[derive(Clone)]
pub struct DatabaseUrl(pub Secret<String>);

#[derive(thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    MissingSessionStore(#[from] MissingSessionStore),
    #[error("The secret must be at least {} bytes long", MIN_SECRET_LENGTH)]
    WeakSecret,
    #[error("Failed to bind to {address}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl fmt::Debug for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        error_chain_fmt(self, f)
    }
}

fn signing_key(secret: &Secret<String>) -> Result<Key, StartupError> {
    let secret = secret.expose_secret().as_bytes();
    if secret.len() < MIN_SECRET_LENGTH {
        return Err(StartupError::WeakSecret);
    }
    Ok(Key::from(secret))
}

/// Everything needed to assemble the middleware chain of one worker.
#[derive(Clone)]
pub struct Pipeline {
    environment: Environment,
    signing_key: Key,
    session_backend: SessionBackend,
    session: SessionSettings,
    body: BodySettings,
    database_url: DatabaseUrl,
}

impl Pipeline {
    pub fn new(
        configuration: &Settings,
        durable_store: Option<DurableSessionStore>,
    ) -> Result<Self, StartupError> {
        let environment = configuration.application.environment;
        let signing_key = signing_key(&configuration.application.secret)?;
        let session_backend = SessionBackend::select(
            environment,
            durable_store,
            configuration.session.cleanup_config(),
        )?;

        Ok(Self {
            environment,
            signing_key,
            session_backend,
            session: configuration.session.clone(),
            body: configuration.body.clone(),
            database_url: DatabaseUrl(configuration.database.url.clone()),
        })
    }

    pub fn session_backend(&self) -> &SessionBackend {
        &self.session_backend
    }

    pub fn into_app<F>(
        self,
        routes: F,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    >
    where
        F: FnOnce(&mut web::ServiceConfig),
    {
        // Session cookies are HttpOnly by default.
        let session_middleware =
            SessionMiddleware::builder(self.session_backend, self.signing_key.clone())
                .cookie_name(self.session.cookie_name.clone())
                .cookie_secure(self.session.cookie_secure)
                .cookie_content_security(CookieContentSecurity::Signed)
                .session_length(SessionLength::Predetermined {
                    max_session_length: Some(self.session.cookie_max_age()),
                })
                .build();

        // The last middleware registered sees the request first.
        App::new()
            .wrap(Compress::default())
            .wrap(from_fn(attach_session_user))
            .wrap(from_fn(initialize_authentication))
            .wrap(from_fn(initialize_session))
            .wrap(session_middleware)
            .wrap(from_fn(parse_cookies))
            .wrap(TracingLogger::default())
            .wrap(from_fn(log_client_address))
            .app_data(json_config(&self.body))
            .app_data(CookieSigningKey(self.signing_key))
            .app_data(web::Data::new(self.database_url))
            .configure(routes)
    }
}

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Fails before binding anything if the pipeline cannot be assembled.
    ///
    /// Call from within a Tokio runtime: the transient session store cleanup
    /// task is only started when one is available.
    pub fn build<F>(
        configuration: Settings,
        durable_store: Option<DurableSessionStore>,
        routes: F,
    ) -> Result<Self, StartupError>
    where
        F: Fn(&mut web::ServiceConfig) + Clone + Send + 'static,
    {
        let pipeline = Pipeline::new(&configuration, durable_store)?;

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)
            .map_err(|source| StartupError::Bind { address, source })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            %port,
            environment = %pipeline.environment,
            transient_sessions = pipeline.session_backend().is_transient(),
            "application configured"
        );

        let server = HttpServer::new(move || pipeline.clone().into_app(routes.clone()))
            .listen(listener)?
            .run();

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), anyhow::Error> {
        self.server.await?;
        Ok(())
    }
}
