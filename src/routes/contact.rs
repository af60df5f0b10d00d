use crate::domains::{NewContact, ValidationErrors};
use crate::email_client::EmailClient;
use crate::routes::error_chain_fmt;
use crate::storage::{MessageStore, StoredMessage};
use crate::telemetry::spawn_blocking_with_tracing;
use actix_web::http::StatusCode;
use actix_web::{post, web, HttpResponse, ResponseError};
use anyhow::Context;
use chrono::Utc;

#[derive(serde::Deserialize)]
pub struct ContactForm {
    // Options so a missing field surfaces as a per-field validation error
    // instead of a deserialization failure.
    name: Option<String>,
    email: Option<String>,
    message: Option<String>,
}

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error("Datos inválidos")]
    ValidationError(#[source] ValidationErrors),
    #[error("Error interno del servidor")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for ContactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ContactError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ContactError::ValidationError(errors) => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "Datos inválidos",
                    "details": errors,
                }))
            }
            // Opaque on purpose; the cause chain only goes to the logs.
            ContactError::UnexpectedError(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Error interno del servidor",
                }))
            }
        }
    }
}

#[tracing::instrument(
    name = "Handling a contact submission",
    skip(form, email_client, store),
    fields(contact_name = tracing::field::Empty, contact_email = tracing::field::Empty)
)]
#[post("/api/contact")]
pub async fn contact(
    form: web::Json<ContactForm>,
    email_client: web::Data<Option<EmailClient>>,
    store: web::Data<dyn MessageStore>,
) -> Result<HttpResponse, ContactError> {
    let form = form.into_inner();
    let new_contact = NewContact::parse(form.name, form.email, form.message)
        .map_err(ContactError::ValidationError)?;
    tracing::Span::current().record(
        "contact_name",
        &tracing::field::display(new_contact.name.as_ref()),
    );
    tracing::Span::current().record(
        "contact_email",
        &tracing::field::display(new_contact.email.as_ref()),
    );
    let received_at = Utc::now();

    let sent = attempt_dispatch(email_client.get_ref().as_ref(), &new_contact).await;
    if !sent {
        let record = StoredMessage::new(&new_contact, received_at);
        let store = store.into_inner();
        spawn_blocking_with_tracing(move || store.append(record))
            .await
            .context("Failed to reach the blocking pool")?
            .context("Failed to append the message to the local log")?;
    }

    // The caller is not told which path was used.
    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}

/// The transport never fails past this boundary: an unconfigured client and
/// any transport fault both come back as "not sent".
#[tracing::instrument(name = "Dispatching the contact mail", skip(email_client, new_contact))]
async fn attempt_dispatch(email_client: Option<&EmailClient>, new_contact: &NewContact) -> bool {
    let client = match email_client {
        Some(client) => client,
        None => {
            tracing::info!("Mail transport is not configured, using the local log");
            return false;
        }
    };

    let subject = format!(
        "Nuevo contacto: {} <{}>",
        new_contact.name.as_ref(),
        new_contact.email.as_ref()
    );
    let text_body = format!(
        "Nombre: {}\nEmail: {}\n\nMensaje:\n{}\n",
        new_contact.name.as_ref(),
        new_contact.email.as_ref(),
        new_contact.message.as_ref()
    );
    let html_body = format!(
        "<p>Nombre: {}</p><p>Email: {}</p><p>Mensaje:</p><p>{}</p>",
        htmlescape::encode_minimal(new_contact.name.as_ref()),
        htmlescape::encode_minimal(new_contact.email.as_ref()),
        htmlescape::encode_minimal(new_contact.message.as_ref())
    );

    match client
        .send_email(client.recipient(), &subject, &html_body, &text_body)
        .await
    {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                error.cause_chain = ?e,
                "Failed to dispatch the contact mail, using the local log"
            );
            false
        }
    }
}
