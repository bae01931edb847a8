//! The booking flow. `book_ticket` reads the event and writes the booking
//! on one transaction, so the stored total always matches the price it was
//! computed from.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::{Extension, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::booking::{self, TicketDetails};
use crate::models::booking::{AdminBookingView, UserBookingView};
use crate::models::Role;
use crate::qr;
use crate::state::AppState;
use crate::store::bookings::NewBooking;
use crate::store::{accounts, bookings, events, profiles};
use crate::upload::UploadKind;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Debug, Deserialize)]
pub struct BookTicketPayload {
    pub event_id: Option<Uuid>,
    pub tickets_count: Option<i32>,
}

pub async fn book_ticket(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<BookTicketPayload>,
) -> Result<Response, AppError> {
    let (Some(event_id), Some(tickets_count)) = (payload.event_id, payload.tickets_count) else {
        return Err(AppError::Validation(
            "Event ID and ticket count are required.".to_string(),
        ));
    };
    booking::validate_tickets_count(tickets_count)?;

    let mut tx = state.pool.begin().await?;

    let event = events::find_by_id(&mut *tx, event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found.".to_string()))?;
    let user = accounts::find_by_id(&mut *tx, Role::User, auth.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;
    let email = profiles::find_by_account(&mut *tx, Role::User, auth.id)
        .await?
        .and_then(|details| details.email)
        .unwrap_or_else(|| "N/A".to_string());

    let total_price = booking::total_price(event.price, tickets_count);
    let booking_date = Utc::now();

    let ticket_text = booking::render_ticket(&TicketDetails {
        event_title: &event.title,
        event_date: event.date,
        venue: &event.venue,
        attendee_name: &user.full_name(),
        mobile: &user.mobile,
        email: &email,
        tickets_count,
        total_price,
        booked_at: booking_date,
    });
    let qr_code = qr::to_data_uri(&ticket_text)?;

    let record = bookings::insert(
        &mut *tx,
        NewBooking {
            event_id,
            user_id: auth.id,
            tickets_count,
            total_price,
            qr_code: &qr_code,
            booking_date,
        },
    )
    .await?;

    tx.commit().await?;

    // Read-after-write convenience join; nothing here is stored twice.
    Ok(created(
        json!({
            "booking": {
                "id": record.id,
                "tickets_count": record.tickets_count,
                "total_price": record.total_price,
                "qr_code": record.qr_code,
                "booking_date": record.booking_date,
                "event": {
                    "id": event.id,
                    "title": event.title,
                    "date": event.date,
                    "venue": event.venue,
                    "price": event.price,
                },
                "user": {
                    "id": user.id,
                    "first_name": user.first_name,
                    "last_name": user.last_name,
                    "mobile": user.mobile,
                    "email": email,
                },
            }
        }),
        "Ticket booked successfully.",
    ))
}

pub async fn my_bookings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Response, AppError> {
    let image_base = UploadKind::EventImage.public_base(&state.config.public_base_url);
    let bookings: Vec<UserBookingView> = bookings::list_for_user(&state.pool, auth.id)
        .await?
        .into_iter()
        .map(|row| row.into_view(&image_base))
        .collect();

    Ok(success(
        json!({ "bookings": bookings }),
        "Bookings fetched successfully",
    ))
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    // A missing booking and someone else's booking answer identically.
    if !bookings::delete_owned(&state.pool, auth.id, id).await? {
        return Err(AppError::NotFound(
            "Booking not found or not authorized.".to_string(),
        ));
    }
    Ok(empty_success("Booking cancelled successfully."))
}

pub async fn all_bookings(State(state): State<AppState>) -> Result<Response, AppError> {
    let bookings: Vec<AdminBookingView> = bookings::list_all(&state.pool)
        .await?
        .into_iter()
        .map(AdminBookingView::from)
        .collect();

    Ok(success(
        json!({ "bookings": bookings }),
        "Bookings fetched successfully",
    ))
}
