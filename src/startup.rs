use std::net::TcpListener;
use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::dev::Server;
use actix_web::web;
use actix_web::App;
use actix_web::HttpServer;
use secrecy::ExposeSecret;
use secrecy::Secret;
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::registry::SignupRegistry;
use crate::routes::close_waitlist;
use crate::routes::health_check;
use crate::routes::join_waitlist;
use crate::routes::landing;
use crate::routes::open_waitlist;
use crate::store::WaitlistBackend;
use crate::waitlist::WaitlistStore;

/// Wrapper for actix's `Server` with access to the bound port. Not to be
/// confused with actix's `App`!
pub struct Application {
    /// Left private; use `port` to access
    port: u16,
    server: Server,
    registry: Arc<SignupRegistry<WaitlistBackend>>,
}

impl Application {
    /// Bind the listener, pick the store, and build the `Server`. A missing
    /// store is not an error here.
    pub async fn build(cfg: Settings) -> Result<Self, anyhow::Error> {
        let addr = format!("{}:{}", cfg.application.host, cfg.application.port);
        let listener = TcpListener::bind(addr)?;
        // port 0 in config -> randomised port assigned by the OS
        let port = listener.local_addr()?.port();

        let store = WaitlistBackend::from_settings(cfg.store.as_ref())?;
        let registry = Arc::new(SignupRegistry::new(store, &cfg.waitlist));
        tracing::info!(
            store_configured = registry.is_configured(),
            source = %cfg.waitlist.source,
            "Built signup registry"
        );

        let server = run(
            listener,
            registry.clone(),
            cfg.application.session_secret,
            cfg.application.secure_cookies,
        )?;

        Ok(Self {
            port,
            server,
            registry,
        })
    }

    pub fn port(&self) -> u16 { self.port }

    /// Shared with the expiry worker
    pub fn registry(&self) -> Arc<SignupRegistry<WaitlistBackend>> { self.registry.clone() }

    /// Because this consumes `self`, this should be the final function call (or
    /// passed to `tokio::spawn`)
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> { self.server.await }
}

/// The server is not responsible for binding to an address, it only listens to
/// an already bound address.
///
/// Declares all endpoints.
pub fn run<S: WaitlistStore + 'static>(
    listener: TcpListener,
    registry: Arc<SignupRegistry<S>>,
    session_secret: Secret<String>,
    secure_cookies: bool,
) -> Result<Server, anyhow::Error> {
    let secret_key = Key::try_from(session_secret.expose_secret().as_bytes())
        .map_err(|e| anyhow::anyhow!("session_secret must be at least 64 bytes: {e}"))?;

    // `Data` is an `Arc` internally; reuse the one the expiry worker holds
    let registry = web::Data::from(registry);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            // the session only carries the visitor id, so a signed cookie is enough
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_name("waitlist_session".to_string())
                    .cookie_secure(secure_cookies)
                    .build(),
            )
            .route("/", web::get().to(landing::<S>))
            .route("/health_check", web::get().to(health_check))
            .route("/waitlist", web::post().to(join_waitlist::<S>))
            .route("/waitlist/open", web::post().to(open_waitlist::<S>))
            .route("/waitlist/close", web::post().to(close_waitlist::<S>))
            .app_data(registry.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
