//! Telegram Bot API transport.
//!
//! Long-polls getUpdates, parses commands and callback queries, and
//! dispatches into the application handlers. Each update is served on
//! its own task so one user's slow provider fetch never blocks another
//! user's commands.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::application::handlers::{
    ApplyFilterCommand, ApplyFilterHandler, GetHistoryHandler, GetHistoryQuery, PaginateCommand,
    PaginateHandler, RefineFieldCommand, RefineFieldHandler, RequestForecastCommand,
    RequestForecastHandler, StartQueryCommand, StartQueryHandler,
};
use crate::application::registry::SessionRegistry;
use crate::domain::filter::FilterCriteria;
use crate::domain::foundation::{UserId, ValidationError};
use crate::domain::pagination::PageDirection;
use crate::domain::refine::{ParameterValidator, RefinementParameters};
use crate::domain::session::{PageView, SessionError};
use crate::domain::vehicle::{LookupKey, TransactionRecord, VehicleQuery, Vin};
use crate::ports::ChartArtifact;

use super::commands::{self, BotCommand};
use super::format;

/// Wait before re-polling after a transport error.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Extra request-timeout headroom on top of the long-poll window.
const POLL_TIMEOUT_MARGIN: Duration = Duration::from_secs(10);

/// Configuration for the Telegram transport.
#[derive(Debug, Clone)]
pub struct TelegramBotConfig {
    token: Secret<String>,
    pub base_url: String,
    pub poll_timeout: Duration,
}

impl TelegramBotConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Secret::new(token.into()),
            base_url: "https://api.telegram.org".to_string(),
            poll_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

/// The application handlers the bot dispatches into.
pub struct BotHandlers {
    pub registry: Arc<SessionRegistry>,
    pub start_query: StartQueryHandler,
    pub refine_field: RefineFieldHandler,
    pub apply_filter: ApplyFilterHandler,
    pub paginate: PaginateHandler,
    pub request_forecast: RequestForecastHandler,
    pub get_history: GetHistoryHandler,
}

/// Long-polling Telegram bot.
pub struct TelegramBot {
    config: TelegramBotConfig,
    client: reqwest::Client,
    handlers: BotHandlers,
}

impl TelegramBot {
    pub fn new(config: TelegramBotConfig, handlers: BotHandlers) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.poll_timeout + POLL_TIMEOUT_MARGIN)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            config,
            client,
            handlers,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.base_url,
            self.config.token(),
            method
        )
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &Value,
    ) -> Result<T, TelegramError> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| TelegramError::network(method, e))?;

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| TelegramError::parse(method, e))?;

        if !envelope.ok {
            return Err(TelegramError::Api {
                method: method.to_string(),
                description: envelope
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }
        envelope.result.ok_or_else(|| TelegramError::Api {
            method: method.to_string(),
            description: "ok response without a result".to_string(),
        })
    }

    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        self.call(
            "getUpdates",
            &serde_json::json!({
                "offset": offset,
                "timeout": self.config.poll_timeout.as_secs(),
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }

    /// Sends a text message, splitting it when it exceeds the Telegram
    /// length limit.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        for chunk in format::chunk_message(text) {
            let _: Message = self
                .call(
                    "sendMessage",
                    &serde_json::json!({ "chat_id": chat_id, "text": chunk }),
                )
                .await?;
        }
        Ok(())
    }

    /// Sends a text message with an inline keyboard attached to the last
    /// chunk.
    async fn send_with_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<(), TelegramError> {
        let chunks = format::chunk_message(text);
        let last = chunks.len().saturating_sub(1);
        for (i, chunk) in chunks.iter().enumerate() {
            let body = if i == last {
                serde_json::json!({
                    "chat_id": chat_id,
                    "text": chunk,
                    "reply_markup": keyboard,
                })
            } else {
                serde_json::json!({ "chat_id": chat_id, "text": chunk })
            };
            let _: Message = self.call("sendMessage", &body).await?;
        }
        Ok(())
    }

    async fn send_photo(&self, chat_id: i64, url: &str) -> Result<(), TelegramError> {
        let _: Message = self
            .call(
                "sendPhoto",
                &serde_json::json!({ "chat_id": chat_id, "photo": url }),
            )
            .await?;
        Ok(())
    }

    /// Edits a previously sent message, optionally replacing its inline
    /// keyboard.
    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), TelegramError> {
        let mut body = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
        });
        if let Some(keyboard) = keyboard {
            body["reply_markup"] = serde_json::to_value(keyboard)
                .map_err(|e| TelegramError::Parse {
                    method: "editMessageText".to_string(),
                    message: e.to_string(),
                })?;
        }
        // The API returns either the edited Message or `true`.
        let _: Value = self.call("editMessageText", &body).await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TelegramError> {
        let _: Value = self
            .call(
                "answerCallbackQuery",
                &serde_json::json!({ "callback_query_id": callback_id }),
            )
            .await?;
        Ok(())
    }

    /// Runs the long-poll loop forever. Each update is handled on its own
    /// task.
    pub async fn run(self: Arc<Self>) {
        info!("Telegram bot polling for updates");
        let mut offset: i64 = 0;

        loop {
            match self.get_updates(offset).await {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        let bot = Arc::clone(&self);
                        tokio::spawn(async move {
                            bot.handle_update(update).await;
                        });
                    }
                }
                Err(err) => {
                    warn!(error = %err, "getUpdates failed; backing off");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                }
            }
        }
    }

    async fn handle_update(&self, update: Update) {
        let outcome = if let Some(message) = update.message {
            self.handle_message(message).await
        } else if let Some(callback) = update.callback_query {
            self.handle_callback(callback).await
        } else {
            Ok(())
        };

        if let Err(err) = outcome {
            error!(error = %err, "Failed to handle update");
        }
    }

    async fn handle_message(&self, message: Message) -> Result<(), TelegramError> {
        let text = match &message.text {
            Some(text) => text,
            None => return Ok(()),
        };
        let from = match &message.from {
            Some(from) => from,
            None => return Ok(()),
        };
        let user_id = UserId::from(from.id);
        let chat_id = message.chat.id;

        match commands::parse(text) {
            None => Ok(()),
            Some(Err(err)) => self.send_text(chat_id, &err.message).await,
            Some(Ok(command)) => self.dispatch(chat_id, user_id, command).await,
        }
    }

    async fn dispatch(
        &self,
        chat_id: i64,
        user_id: UserId,
        command: BotCommand,
    ) -> Result<(), TelegramError> {
        match command {
            BotCommand::Start => self.send_text(chat_id, format::START_TEXT).await,
            BotCommand::Help => self.send_text(chat_id, format::HELP_TEXT).await,
            BotCommand::Vin {
                vin,
                subseries,
                transmission,
                refinements,
            } => {
                let query = match build_vin_query(&vin, subseries, transmission, &refinements) {
                    Ok(query) => query,
                    Err(err) => return self.send_text(chat_id, &err.to_string()).await,
                };
                self.run_query(chat_id, user_id, query).await
            }
            BotCommand::Ymm {
                year,
                make,
                model,
                trim,
                refinements,
            } => {
                let query = match build_ymm_query(&year, &make, &model, trim, &refinements) {
                    Ok(query) => query,
                    Err(err) => return self.send_text(chat_id, &err.to_string()).await,
                };
                self.run_query(chat_id, user_id, query).await
            }
            BotCommand::Filter(pairs) => match commands::parse_filter_criteria(&pairs) {
                Ok(criteria) => self.run_filter(chat_id, user_id, criteria).await,
                Err(err) => self.send_text(chat_id, &err.message).await,
            },
            BotCommand::FilterClear => {
                self.run_filter(chat_id, user_id, FilterCriteria::default())
                    .await
            }
            BotCommand::Page(direction) => self.run_paginate(chat_id, user_id, direction).await,
            BotCommand::Trend { months } => self.run_forecast(chat_id, user_id, months).await,
            BotCommand::History => self.run_history(chat_id, user_id).await,
        }
    }

    async fn run_query(
        &self,
        chat_id: i64,
        user_id: UserId,
        query: VehicleQuery,
    ) -> Result<(), TelegramError> {
        self.send_text(chat_id, &format!("Searching for auction data for {}...", query))
            .await?;

        let result = self
            .handlers
            .start_query
            .handle(StartQueryCommand {
                user_id: user_id.clone(),
                query,
            })
            .await;

        match result {
            Ok(result) => {
                let summary = format::report_summary(&result.report);
                self.send_report_options(chat_id, &summary, &result.report.transactions, result.query.params())
                    .await
            }
            Err(err) => self.report_error(chat_id, &user_id, err).await,
        }
    }

    /// Sends the report summary with the follow-up options keyboard the
    /// report calls for: View All when the list is long, Refine when
    /// color or grade is still unset.
    async fn send_report_options(
        &self,
        chat_id: i64,
        summary: &str,
        transactions: &[TransactionRecord],
        params: &RefinementParameters,
    ) -> Result<(), TelegramError> {
        let mut rows = Vec::new();
        if transactions.len() > format::RECENT_TRANSACTIONS_SHOWN {
            rows.push(vec![InlineButton::new(
                format!("📋 View All {} Transactions", transactions.len()),
                "page_first",
            )]);
        }
        if params.color.is_none() || params.grade.is_none() {
            rows.push(vec![InlineButton::new(
                "🔄 Refine Valuation",
                "refine_valuation",
            )]);
        }

        if rows.is_empty() {
            self.send_text(chat_id, summary).await
        } else {
            self.send_with_keyboard(chat_id, summary, &InlineKeyboard::new(rows))
                .await
        }
    }

    async fn run_filter(
        &self,
        chat_id: i64,
        user_id: UserId,
        criteria: FilterCriteria,
    ) -> Result<(), TelegramError> {
        let cleared = criteria.is_empty();
        let result = self
            .handlers
            .apply_filter
            .handle(ApplyFilterCommand {
                user_id: user_id.clone(),
                criteria,
            })
            .await;

        match result {
            Ok(result) => {
                let header = if cleared {
                    format!(
                        "Filter cleared. Showing all {} transactions.\n\n",
                        result.raw_total
                    )
                } else {
                    format!(
                        "Filter applied: {}.\n{} of {} transactions match.\n\n",
                        format::filter_description(&result.criteria),
                        result.page.total_items,
                        result.raw_total
                    )
                };
                let text = format!("{}{}", header, format::transaction_page(&result.page));
                self.send_page(chat_id, &text, &result.page).await
            }
            Err(err) => self.report_error(chat_id, &user_id, err).await,
        }
    }

    async fn run_paginate(
        &self,
        chat_id: i64,
        user_id: UserId,
        direction: PageDirection,
    ) -> Result<(), TelegramError> {
        let result = self
            .handlers
            .paginate
            .handle(PaginateCommand {
                user_id: user_id.clone(),
                direction,
            })
            .await;

        match result {
            Ok(result) => {
                let text = format::transaction_page(&result.page);
                self.send_page(chat_id, &text, &result.page).await
            }
            Err(err) => self.report_error(chat_id, &user_id, err).await,
        }
    }

    async fn send_page(
        &self,
        chat_id: i64,
        text: &str,
        page: &PageView,
    ) -> Result<(), TelegramError> {
        match page_keyboard(page) {
            Some(keyboard) => self.send_with_keyboard(chat_id, text, &keyboard).await,
            None => self.send_text(chat_id, text).await,
        }
    }

    /// Replaces the paginated message in place when the user presses a
    /// navigation button, keeping the chat free of repeated lists.
    async fn paginate_in_place(
        &self,
        chat_id: i64,
        message_id: i64,
        user_id: UserId,
        direction: PageDirection,
    ) -> Result<(), TelegramError> {
        let result = self
            .handlers
            .paginate
            .handle(PaginateCommand {
                user_id: user_id.clone(),
                direction,
            })
            .await;

        match result {
            Ok(result) => {
                let text = format::transaction_page(&result.page);
                self.edit_message(
                    chat_id,
                    message_id,
                    &text,
                    page_keyboard(&result.page).as_ref(),
                )
                .await
            }
            Err(err) => self.report_error(chat_id, &user_id, err).await,
        }
    }

    async fn run_forecast(
        &self,
        chat_id: i64,
        user_id: UserId,
        months: u32,
    ) -> Result<(), TelegramError> {
        let result = self
            .handlers
            .request_forecast
            .handle(RequestForecastCommand {
                user_id: user_id.clone(),
                horizon: months,
            })
            .await;

        match result {
            Ok(result) => {
                self.send_text(chat_id, &format::forecast_text(&result.forecast))
                    .await?;
                if let Some(ChartArtifact::Url(url)) = result.chart {
                    self.send_photo(chat_id, &url).await?;
                }
                Ok(())
            }
            Err(err) => self.report_error(chat_id, &user_id, err).await,
        }
    }

    async fn run_history(&self, chat_id: i64, user_id: UserId) -> Result<(), TelegramError> {
        let result = self
            .handlers
            .get_history
            .handle(GetHistoryQuery {
                user_id: user_id.clone(),
            })
            .await;

        match result {
            Ok(result) => {
                let text = format::history_text(result.active.as_ref(), &result.past);
                self.send_text(chat_id, &text).await
            }
            Err(err) => self.report_error(chat_id, &user_id, err).await,
        }
    }

    async fn handle_callback(&self, callback: CallbackQuery) -> Result<(), TelegramError> {
        // Always answer, otherwise the client shows a spinner forever.
        self.answer_callback(&callback.id).await?;

        let data = match &callback.data {
            Some(data) => data.as_str(),
            None => return Ok(()),
        };
        let message = match &callback.message {
            Some(message) => message,
            None => return Ok(()),
        };
        let user_id = UserId::from(callback.from.id);
        let chat_id = message.chat.id;
        let message_id = message.message_id;

        match data {
            "refine_valuation" => self.prompt_color(chat_id, message_id).await,
            "cancel" => {
                self.edit_message(
                    chat_id,
                    message_id,
                    "Refinement canceled. Applied parameters stay in effect.",
                    None,
                )
                .await
            }
            "region_skip" => self.finish_refinement(chat_id, message_id, &user_id).await,
            "page_first" => {
                self.edit_message(chat_id, message_id, "Loading transactions...", None)
                    .await?;
                self.run_paginate(chat_id, user_id, PageDirection::First)
                    .await
            }
            "page_prev" => {
                self.paginate_in_place(chat_id, message_id, user_id, PageDirection::Previous)
                    .await
            }
            "page_next" => {
                self.paginate_in_place(chat_id, message_id, user_id, PageDirection::Next)
                    .await
            }
            _ => {
                if let Some(color) = data.strip_prefix("color_") {
                    self.refine_step(
                        chat_id,
                        message_id,
                        &user_id,
                        "color",
                        color,
                        RefineStep::Grade,
                    )
                    .await
                } else if let Some(grade) = data.strip_prefix("grade_") {
                    self.refine_step(
                        chat_id,
                        message_id,
                        &user_id,
                        "grade",
                        grade,
                        RefineStep::Odometer,
                    )
                    .await
                } else if let Some(odometer) = data.strip_prefix("odometer_") {
                    self.refine_step(
                        chat_id,
                        message_id,
                        &user_id,
                        "odometer",
                        odometer,
                        RefineStep::Region,
                    )
                    .await
                } else if let Some(region) = data.strip_prefix("region_") {
                    self.refine_step(
                        chat_id,
                        message_id,
                        &user_id,
                        "region",
                        region,
                        RefineStep::Done,
                    )
                    .await
                } else {
                    debug!(data = %data, "Ignoring unknown callback data");
                    Ok(())
                }
            }
        }
    }

    /// Applies one refinement selection and moves the keyboard to the
    /// next step. The valuation is re-fetched on every press, so each
    /// prompt reflects data narrowed by everything chosen so far.
    async fn refine_step(
        &self,
        chat_id: i64,
        message_id: i64,
        user_id: &UserId,
        field: &str,
        value: &str,
        next: RefineStep,
    ) -> Result<(), TelegramError> {
        let result = self
            .handlers
            .refine_field
            .handle(RefineFieldCommand {
                user_id: user_id.clone(),
                field: field.to_string(),
                value: value.to_string(),
            })
            .await;

        let result = match result {
            Ok(result) => result,
            Err(err) if err.is_silent() => {
                debug!(user_id = %user_id, "Discarding superseded refinement selection");
                return Ok(());
            }
            Err(err) => {
                if err.is_fatal() {
                    warn!(user_id = %user_id, code = %err.code(), error = %err, "Fatal session error; resetting session");
                    self.handlers.registry.reset_session(user_id).await;
                }
                return self.edit_message(chat_id, message_id, &err.message(), None).await;
            }
        };

        let selected = selected_summary(result.query.params());
        match next {
            RefineStep::Grade => {
                self.edit_message(
                    chat_id,
                    message_id,
                    &format!("{}Please select the vehicle condition grade:", selected),
                    Some(&grade_keyboard()),
                )
                .await
            }
            RefineStep::Odometer => {
                self.edit_message(
                    chat_id,
                    message_id,
                    &format!("{}Please select approximate mileage:", selected),
                    Some(&odometer_keyboard()),
                )
                .await
            }
            RefineStep::Region => {
                self.edit_message(
                    chat_id,
                    message_id,
                    &format!("{}Please select region:", selected),
                    Some(&region_keyboard()),
                )
                .await
            }
            RefineStep::Done => self.finish_refinement(chat_id, message_id, user_id).await,
        }
    }

    async fn prompt_color(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramError> {
        self.edit_message(
            chat_id,
            message_id,
            "Please select the vehicle color:",
            Some(&color_keyboard()),
        )
        .await
    }

    /// Shows the refined report. Every selection was already applied and
    /// fetched along the way, so this only renders the current state.
    async fn finish_refinement(
        &self,
        chat_id: i64,
        message_id: i64,
        user_id: &UserId,
    ) -> Result<(), TelegramError> {
        self.edit_message(chat_id, message_id, "Fetching refined valuation with your parameters...", None)
            .await?;

        let snapshot = {
            let cell = match self.handlers.registry.get_or_create(user_id).await {
                Ok(cell) => cell,
                Err(err) => return self.report_error(chat_id, user_id, err).await,
            };
            let cell = cell.lock().await;
            cell.session
                .report()
                .cloned()
                .map(|report| (report, cell.session.active_query().cloned()))
        };

        match snapshot {
            Some((report, query)) => {
                let summary = format!(
                    "📊 Refined Valuation Results:\n\n{}",
                    format::report_summary(&report)
                );
                let params = query.map(|q| q.params().clone()).unwrap_or_default();
                self.send_report_options(chat_id, &summary, &report.transactions, &params)
                    .await
            }
            None => {
                self.send_text(chat_id, "No active query. Look up a vehicle first.")
                    .await
            }
        }
    }

    /// Routes a session error to the user. Stale results are dropped
    /// silently; fatal errors also reset the session.
    async fn report_error(
        &self,
        chat_id: i64,
        user_id: &UserId,
        err: SessionError,
    ) -> Result<(), TelegramError> {
        if err.is_silent() {
            debug!(user_id = %user_id, "Discarding superseded result");
            return Ok(());
        }
        if err.is_fatal() {
            warn!(user_id = %user_id, code = %err.code(), error = %err, "Fatal session error; resetting session");
            self.handlers.registry.reset_session(user_id).await;
        }
        self.send_text(chat_id, &err.message()).await
    }
}

/// Which prompt follows the refinement selection just applied.
enum RefineStep {
    Grade,
    Odometer,
    Region,
    Done,
}

fn build_vin_query(
    vin: &str,
    subseries: Option<String>,
    transmission: Option<String>,
    refinements: &[(String, String)],
) -> Result<VehicleQuery, ValidationError> {
    let vin = Vin::new(vin)?;
    let key = LookupKey::for_vin(vin, subseries, transmission)?;
    let params = build_params(refinements)?;
    Ok(VehicleQuery::with_params(key, params))
}

fn build_ymm_query(
    year: &str,
    make: &str,
    model: &str,
    trim: Option<String>,
    refinements: &[(String, String)],
) -> Result<VehicleQuery, ValidationError> {
    let year: u16 = year
        .parse()
        .map_err(|_| ValidationError::invalid_format("year", "must be a four-digit year"))?;
    let key = LookupKey::for_ymm(year, make, model, trim)?;
    let params = build_params(refinements)?;
    Ok(VehicleQuery::with_params(key, params))
}

fn build_params(
    refinements: &[(String, String)],
) -> Result<RefinementParameters, ValidationError> {
    let today = Utc::now().date_naive();
    let mut params = RefinementParameters::default();
    for (key, value) in refinements {
        params.apply(ParameterValidator::validate(key, value, today)?);
    }
    Ok(params)
}

/// "Selected color: WHITE\nSelected grade: 4.0\n" style recap of the
/// parameters applied so far.
fn selected_summary(params: &RefinementParameters) -> String {
    let mut summary = String::new();
    for (key, value) in params.to_query_pairs() {
        summary.push_str(&format!("Selected {}: {}\n", key, value));
    }
    summary
}

fn color_keyboard() -> InlineKeyboard {
    const COLORS: [&str; 10] = [
        "BLACK", "WHITE", "SILVER", "GRAY", "RED", "BLUE", "BROWN", "GREEN", "GOLD", "OTHER",
    ];
    let mut rows: Vec<Vec<InlineButton>> = COLORS
        .iter()
        .map(|color| vec![InlineButton::new(*color, format!("color_{}", color))])
        .collect();
    rows.push(vec![cancel_button()]);
    InlineKeyboard::new(rows)
}

fn grade_keyboard() -> InlineKeyboard {
    const GRADES: [&str; 9] = [
        "1.0", "1.5", "2.0", "2.5", "3.0", "3.5", "4.0", "4.5", "5.0",
    ];
    let mut rows: Vec<Vec<InlineButton>> = GRADES
        .iter()
        .map(|grade| {
            vec![InlineButton::new(
                format!("Grade {}", grade),
                format!("grade_{}", grade),
            )]
        })
        .collect();
    rows.push(vec![cancel_button()]);
    InlineKeyboard::new(rows)
}

// Bucket midpoints stand in for the ranges on the labels.
fn odometer_keyboard() -> InlineKeyboard {
    InlineKeyboard::new(vec![
        vec![
            InlineButton::new("< 10,000", "odometer_5000"),
            InlineButton::new("10-30k", "odometer_20000"),
        ],
        vec![
            InlineButton::new("30-60k", "odometer_45000"),
            InlineButton::new("60-100k", "odometer_80000"),
        ],
        vec![
            InlineButton::new("100-150k", "odometer_125000"),
            InlineButton::new("> 150k", "odometer_175000"),
        ],
        vec![cancel_button()],
    ])
}

fn region_keyboard() -> InlineKeyboard {
    InlineKeyboard::new(vec![
        vec![
            InlineButton::new("Northeast (NE)", "region_NE"),
            InlineButton::new("Southeast (SE)", "region_SE"),
        ],
        vec![
            InlineButton::new("Midwest (MW)", "region_MW"),
            InlineButton::new("Southwest (SW)", "region_SW"),
        ],
        vec![
            InlineButton::new("West (W)", "region_W"),
            InlineButton::new("Skip", "region_skip"),
        ],
        vec![cancel_button()],
    ])
}

fn cancel_button() -> InlineButton {
    InlineButton::new("❌ Cancel", "cancel")
}

/// Previous/Next navigation for the transaction list; None when one
/// page holds everything.
fn page_keyboard(page: &PageView) -> Option<InlineKeyboard> {
    if page.page_count <= 1 {
        return None;
    }
    let mut row = Vec::new();
    if page.page_index > 0 {
        row.push(InlineButton::new("⬅️ Previous", "page_prev"));
    }
    if page.page_index + 1 < page.page_count {
        row.push(InlineButton::new("Next ➡️", "page_next"));
    }
    Some(InlineKeyboard::new(vec![row]))
}

/// Transport errors from the Bot API.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("{method} rejected: {description}")]
    Api { method: String, description: String },
    #[error("{method} failed: {message}")]
    Network { method: String, message: String },
    #[error("{method} returned an unreadable response: {message}")]
    Parse { method: String, message: String },
}

impl TelegramError {
    fn network(method: &str, err: reqwest::Error) -> Self {
        Self::Network {
            method: method.to_string(),
            message: err.to_string(),
        }
    }

    fn parse(method: &str, err: reqwest::Error) -> Self {
        Self::Parse {
            method: method.to_string(),
            message: err.to_string(),
        }
    }
}

// ----- Telegram API Types -----

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    #[serde(default)]
    message: Option<Message>,
    #[serde(default)]
    callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
struct Message {
    message_id: i64,
    chat: Chat,
    #[serde(default)]
    from: Option<TelegramUser>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct TelegramUser {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    id: String,
    from: TelegramUser,
    #[serde(default)]
    message: Option<Message>,
    #[serde(default)]
    data: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct InlineKeyboard {
    inline_keyboard: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    fn new(rows: Vec<Vec<InlineButton>>) -> Self {
        Self {
            inline_keyboard: rows,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct InlineButton {
    text: String,
    callback_data: String,
}

impl InlineButton {
    fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Grade;
    use crate::domain::refine::RefineField;

    #[test]
    fn config_defaults_to_public_api() {
        let config = TelegramBotConfig::new("123:token");
        assert_eq!(config.base_url, "https://api.telegram.org");
        assert_eq!(config.poll_timeout, Duration::from_secs(30));
        assert_eq!(config.token(), "123:token");
    }

    #[test]
    fn config_builders_override_defaults() {
        let config = TelegramBotConfig::new("123:token")
            .with_base_url("http://localhost:8081")
            .with_poll_timeout(Duration::from_secs(5));
        assert_eq!(config.base_url, "http://localhost:8081");
        assert_eq!(config.poll_timeout, Duration::from_secs(5));
    }

    #[test]
    fn config_debug_hides_the_token() {
        let config = TelegramBotConfig::new("123:very-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("very-secret"));
    }

    #[test]
    fn build_vin_query_accepts_refinements() {
        let query = build_vin_query(
            "WBA3C1C5XFP853102",
            None,
            None,
            &[("grade".to_string(), "4.0".to_string())],
        )
        .unwrap();

        assert_eq!(query.params().grade, Some(Grade::try_new(4.0).unwrap()));
        assert_eq!(format!("{}", query), "VIN WBA3C1C5XFP853102 [grade=4.0]");
    }

    #[test]
    fn build_vin_query_rejects_bad_vins() {
        assert!(build_vin_query("SHORT", None, None, &[]).is_err());
    }

    #[test]
    fn build_ymm_query_rejects_non_numeric_years() {
        let result = build_ymm_query("soon", "Honda", "Accord", None, &[]);
        assert!(result.is_err());
    }

    #[test]
    fn build_ymm_query_carries_trim() {
        let query =
            build_ymm_query("2020", "Honda", "Accord", Some("Sport".to_string()), &[]).unwrap();
        assert_eq!(format!("{}", query), "2020 Honda Accord Sport");
    }

    #[test]
    fn selected_summary_lists_applied_parameters() {
        let mut params = RefinementParameters::default();
        params.apply(RefineField::Color("WHITE".to_string()));
        params.apply(RefineField::Grade(Grade::try_new(4.0).unwrap()));

        assert_eq!(
            selected_summary(&params),
            "Selected color: WHITE\nSelected grade: 4.0\n"
        );
    }

    #[test]
    fn color_keyboard_has_one_color_per_row_plus_cancel() {
        let keyboard = color_keyboard();
        assert_eq!(keyboard.inline_keyboard.len(), 11);
        assert_eq!(keyboard.inline_keyboard[0][0].callback_data, "color_BLACK");
        assert_eq!(
            keyboard.inline_keyboard.last().unwrap()[0].callback_data,
            "cancel"
        );
    }

    #[test]
    fn grade_keyboard_spans_one_to_five_in_half_steps() {
        let keyboard = grade_keyboard();
        assert_eq!(keyboard.inline_keyboard.len(), 10);
        assert_eq!(keyboard.inline_keyboard[0][0].text, "Grade 1.0");
        assert_eq!(keyboard.inline_keyboard[8][0].callback_data, "grade_5.0");
    }

    #[test]
    fn odometer_keyboard_uses_bucket_midpoints() {
        let keyboard = odometer_keyboard();
        assert_eq!(keyboard.inline_keyboard[0][0].callback_data, "odometer_5000");
        assert_eq!(
            keyboard.inline_keyboard[2][1].callback_data,
            "odometer_175000"
        );
    }

    #[test]
    fn region_keyboard_offers_all_regions_and_skip() {
        let keyboard = region_keyboard();
        let all: Vec<&str> = keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .map(|b| b.callback_data.as_str())
            .collect();
        assert_eq!(
            all,
            vec![
                "region_NE",
                "region_SE",
                "region_MW",
                "region_SW",
                "region_W",
                "region_skip",
                "cancel"
            ]
        );
    }

    #[test]
    fn page_keyboard_hides_on_single_page() {
        let page = PageView {
            page_index: 0,
            page_count: 1,
            total_items: 3,
            start_index: 0,
            items: vec![],
        };
        assert!(page_keyboard(&page).is_none());
    }

    #[test]
    fn page_keyboard_offers_only_valid_directions() {
        let first = PageView {
            page_index: 0,
            page_count: 3,
            total_items: 15,
            start_index: 0,
            items: vec![],
        };
        let keyboard = page_keyboard(&first).unwrap();
        let data: Vec<&str> = keyboard.inline_keyboard[0]
            .iter()
            .map(|b| b.callback_data.as_str())
            .collect();
        assert_eq!(data, vec!["page_next"]);

        let middle = PageView {
            page_index: 1,
            ..first.clone()
        };
        let keyboard = page_keyboard(&middle).unwrap();
        let data: Vec<&str> = keyboard.inline_keyboard[0]
            .iter()
            .map(|b| b.callback_data.as_str())
            .collect();
        assert_eq!(data, vec!["page_prev", "page_next"]);

        let last = PageView {
            page_index: 2,
            ..first
        };
        let keyboard = page_keyboard(&last).unwrap();
        let data: Vec<&str> = keyboard.inline_keyboard[0]
            .iter()
            .map(|b| b.callback_data.as_str())
            .collect();
        assert_eq!(data, vec!["page_prev"]);
    }

    #[test]
    fn keyboard_serializes_to_the_wire_shape() {
        let keyboard = InlineKeyboard::new(vec![vec![InlineButton::new("Next ➡️", "page_next")]]);
        let json = serde_json::to_value(&keyboard).unwrap();
        assert_eq!(
            json["inline_keyboard"][0][0]["callback_data"],
            serde_json::json!("page_next")
        );
    }

    #[test]
    fn api_response_envelope_deserializes() {
        let ok: ApiResponse<Vec<Update>> = serde_json::from_str(
            r#"{"ok": true, "result": [{"update_id": 12, "message": {
                "message_id": 5,
                "chat": {"id": 99, "type": "private"},
                "from": {"id": 7, "is_bot": false, "first_name": "Dana"},
                "text": "/vin WBA3C1C5XFP853102"
            }}]}"#,
        )
        .unwrap();
        assert!(ok.ok);
        let updates = ok.result.unwrap();
        assert_eq!(updates[0].update_id, 12);
        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.chat.id, 99);
        assert_eq!(message.from.as_ref().unwrap().id, 7);
        assert_eq!(message.text.as_deref(), Some("/vin WBA3C1C5XFP853102"));

        let err: ApiResponse<Vec<Update>> = serde_json::from_str(
            r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#,
        )
        .unwrap();
        assert!(!err.ok);
        assert_eq!(err.description.as_deref(), Some("Unauthorized"));
    }

    #[test]
    fn callback_updates_deserialize() {
        let update: Update = serde_json::from_str(
            r#"{"update_id": 13, "callback_query": {
                "id": "cb-1",
                "from": {"id": 7, "is_bot": false, "first_name": "Dana"},
                "message": {"message_id": 6, "chat": {"id": 99, "type": "private"}},
                "data": "grade_4.0"
            }}"#,
        )
        .unwrap();

        let callback = update.callback_query.unwrap();
        assert_eq!(callback.id, "cb-1");
        assert_eq!(callback.data.as_deref(), Some("grade_4.0"));
        assert_eq!(callback.message.unwrap().message_id, 6);
    }
}
