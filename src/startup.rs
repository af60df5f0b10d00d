use crate::configuration::{EmailClientSettings, Settings};
use crate::domains::ContactEmail;
use crate::email_client::EmailClient;
use crate::routes::{contact, health_check};
use crate::storage::{JsonFileStore, MessageStore};
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    pub async fn build(settings: &Settings) -> Result<Self, std::io::Error> {
        let email_client = build_email_client(&settings.email_client);
        let store: Arc<dyn MessageStore> = Arc::new(JsonFileStore::new(&settings.storage.data_dir));
        let listener = TcpListener::bind(settings.application.address())?;
        let port = listener.local_addr().unwrap().port();
        let server = run(listener, email_client, store)?;

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

/// `None` unless the full credential set is present; the application then
/// runs with the local log as the only destination.
fn build_email_client(settings: &EmailClientSettings) -> Option<EmailClient> {
    let credentials = settings.credentials()?;
    let scheme = if settings.secure { "https" } else { "http" };
    let base_url = format!("{}://{}:{}", scheme, credentials.host, settings.port);
    let sender = settings
        .sender()
        .expect("A configured mail transport always has a sender");
    let sender = ContactEmail::parse(sender.to_owned()).expect("Invalid sender email");
    let recipient = settings
        .recipient()
        .expect("A configured mail transport always has a recipient");
    let recipient = ContactEmail::parse(recipient.to_owned()).expect("Invalid recipient email");

    Some(EmailClient::new(
        base_url,
        sender,
        recipient,
        credentials.secret.clone(),
        settings.timeout(),
    ))
}

fn run(
    listener: TcpListener,
    email_client: Option<EmailClient>,
    store: Arc<dyn MessageStore>,
) -> Result<Server, std::io::Error> {
    let email_client = web::Data::new(email_client);
    let store: web::Data<dyn MessageStore> = web::Data::from(store);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(email_client.clone())
            .app_data(store.clone())
            .service(health_check)
            .service(contact)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
