//! Checkout route handlers.
//!
//! Totals are recomputed from the stored cart on every render. Placing an
//! order only clears the cart; nothing is charged or recorded.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use parts_store_core::checkout::{self, CheckoutSummary, CustomerInfo, Province};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::notices::{self, Notice};
use crate::state::AppState;

/// Province dropdown entry.
pub struct ProvinceOption {
    pub name: &'static str,
    pub selected: bool,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub customer: CustomerInfo,
    pub provinces: Vec<ProvinceOption>,
    pub item_count: usize,
    pub subtotal: String,
    pub delivery_fee: String,
    pub tax: String,
    pub total: String,
    /// Drives the Place Order button's `disabled` attribute.
    pub can_submit: bool,
    pub notices: Vec<Notice>,
}

/// `GET /checkout` query.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutQuery {
    #[serde(default)]
    pub province: String,
}

/// What the checkout form's submit button asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutAction {
    /// Recompute the summary with the entered province.
    #[default]
    Review,
    /// Place the order.
    Place,
}

/// Checkout form input.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub card_expiry: String,
    #[serde(default)]
    pub card_cvv: String,
    #[serde(default)]
    pub action: CheckoutAction,
}

impl CheckoutForm {
    fn province(&self) -> Option<Province> {
        Province::lookup(&self.province)
    }

    fn customer(&self) -> CustomerInfo {
        CustomerInfo {
            name: self.name.clone(),
            address: self.address.clone(),
            card_number: self.card_number.clone(),
            card_expiry: self.card_expiry.clone(),
            card_cvv: self.card_cvv.clone(),
        }
    }
}

/// Display the checkout form.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CheckoutQuery>,
) -> Result<Response> {
    render(
        &state,
        &session,
        CustomerInfo::default(),
        Province::lookup(&query.province),
        Vec::new(),
        StatusCode::OK,
    )
    .await
}

/// Handle a checkout form submission.
///
/// `review` re-renders with updated totals. `place` checks the required
/// fields, clears the cart, and sends the shopper home with a thank-you.
/// When the cart cannot be cleared the thank-you is still shown, next to the
/// failure, on an error page: the store is not re-read to redraw the form.
#[instrument(skip(state, session, form), fields(action = ?form.action, province = %form.province))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let province = form.province();
    let customer = form.customer();

    if form.action == CheckoutAction::Review {
        return render(&state, &session, customer, province, Vec::new(), StatusCode::OK).await;
    }

    if !checkout::can_submit(&customer, province) {
        return render(
            &state,
            &session,
            customer,
            province,
            vec![Notice::error("Please fill in all required fields.")],
            StatusCode::UNPROCESSABLE_ENTITY,
        )
        .await;
    }

    let thank_you = Notice::success(format!(
        "Thank you, {}. Your order has been placed!",
        customer.name.trim()
    ));

    if let Err(e) = state.store().clear_cart().await {
        notices::push(&session, thank_you).await;
        return Err(AppError::upstream(
            "Failed to clear cart after placing order.",
            e,
        ));
    }

    let province_name = province.map_or("", Province::name);
    add_breadcrumb("checkout", "Order placed", Some(&[("province", province_name)]));
    tracing::info!(province = province_name, "Order placed");

    notices::push(&session, thank_you).await;
    Ok(Redirect::to("/").into_response())
}

/// Render the form over the stored cart.
///
/// Pending session notices are taken only once the cart has loaded, then
/// shown ahead of `extra`.
async fn render(
    state: &AppState,
    session: &Session,
    customer: CustomerInfo,
    province: Option<Province>,
    extra: Vec<Notice>,
    status: StatusCode,
) -> Result<Response> {
    let items = state
        .store()
        .list_cart()
        .await
        .map_err(|e| AppError::upstream("Failed to load cart data.", e))?;

    let mut shown = notices::take(session).await;
    shown.extend(extra);

    let summary = CheckoutSummary::compute(&items, province);
    let can_submit = checkout::can_submit(&customer, province);

    let template = CheckoutTemplate {
        provinces: province_options(province),
        item_count: items.len(),
        subtotal: summary.subtotal.display(),
        delivery_fee: summary.delivery_fee.display(),
        tax: summary.tax.display(),
        total: summary.total.display(),
        can_submit,
        customer,
        notices: shown,
    };

    Ok((status, template).into_response())
}

/// Province dropdown entries with `selected` marking the current choice.
#[must_use]
pub fn province_options(selected: Option<Province>) -> Vec<ProvinceOption> {
    Province::ALL
        .iter()
        .map(|&p| ProvinceOption {
            name: p.name(),
            selected: selected == Some(p),
        })
        .collect()
}
