use std::sync::Mutex;
use std::{io, net};

use actix_web::dev::Server;
use actix_web::middleware::from_fn;
use actix_web::{web, App, HttpServer};
use phonenumber::country;
use tracing_actix_web::TracingLogger;

use crate::authentication::reject_unauthorized_users;
use crate::configuration::{AuthSettings, Settings};
use crate::routes::{
    healthcheck, preview, recipients_table, send_cancel, send_confirm, send_request, set_message,
    upload_recipients,
};
use crate::session::Session;
use crate::sms_client::SmsClient;

/// Default region for phone number normalization
#[derive(Clone, Copy, Debug)]
pub struct DefaultRegion(pub country::Id);

/// Application
pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    /// Build an application based on settings
    pub fn build(config: Settings) -> anyhow::Result<Self> {
        // Build the SMS client and resolve the phone parsing region
        let default_region = config
            .sms_client
            .region()
            .map_err(|e| anyhow::anyhow!(e))?;
        let sms_client = config.sms_client.client();

        // Run the HTTP server and return its data
        let listener = net::TcpListener::bind(format!(
            "{}:{}",
            config.application.app_host, config.application.app_port
        ))?;
        let port = listener.local_addr()?.port();
        let server = run_server(listener, sms_client, default_region, config.auth)?;
        Ok(Self { server, port })
    }

    /// Get application port
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Run application until it is stopped
    pub async fn run_until_stopped(self) -> io::Result<()> {
        self.server.await
    }
}

/// Run the HTTP server
pub fn run_server(
    listener: net::TcpListener,
    sms_client: SmsClient,
    default_region: country::Id,
    auth: AuthSettings,
) -> anyhow::Result<Server> {
    // Prepare data to be added to the application context; the session
    // is the only mutable state and belongs to one operator at a time
    let session = web::Data::new(Mutex::new(Session::default()));
    let sms_client = web::Data::new(sms_client);
    let default_region = web::Data::new(DefaultRegion(default_region));
    let auth = web::Data::new(auth);

    // Start the HTTP server
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/healthcheck", web::get().to(healthcheck))
            .service(
                web::scope("")
                    .wrap(from_fn(reject_unauthorized_users))
                    .route("/recipients", web::post().to(upload_recipients))
                    .route("/recipients", web::get().to(recipients_table))
                    .route("/template", web::post().to(set_message))
                    .route("/preview", web::get().to(preview))
                    .route("/send/request", web::post().to(send_request))
                    .route("/send/cancel", web::post().to(send_cancel))
                    .route("/send/confirm", web::post().to(send_confirm)),
            )
            .app_data(session.clone())
            .app_data(sms_client.clone())
            .app_data(default_region.clone())
            .app_data(auth.clone())
    })
    .listen(listener)?
    .run())
}
