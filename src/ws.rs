use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::executor::run_load_test;
use crate::models::metrics::Metrics;
use crate::models::probe_config::ProbeConfig;

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WorkerEvent {
    Started { name: String, target: String },
    Finished { report: Metrics },
    Error { message: String },
}

impl WorkerEvent {
    fn error(message: impl ToString) -> Self {
        WorkerEvent::Error { message: message.to_string() }
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!(r#"{{"event":"error","message":"{}"}}"#, e))
    }
}

fn reply(ctx: &mut ws::WebsocketContext<WsSession>, event: WorkerEvent) {
    ctx.text(event.to_json());
}

/// Accepts a JSON probe config, runs it, and answers with worker events.
/// One run at a time per session.
pub struct WsSession {
    running: Option<Arc<AtomicBool>>,
}

impl WsSession {
    pub fn new() -> Self {
        Self { running: None }
    }

    fn start_run(&mut self, text: &str, ctx: &mut ws::WebsocketContext<Self>) {
        if self.running.is_some() {
            reply(ctx, WorkerEvent::error("a load test is already running"));
            return;
        }

        let config = match serde_json::from_str::<ProbeConfig>(text) {
            Ok(config) => config,
            Err(e) => {
                reply(ctx, WorkerEvent::error(format!("invalid config: {}", e)));
                return;
            }
        };
        let target = match config.validate().and_then(|_| config.target_url()) {
            Ok(url) => url.to_string(),
            Err(e) => {
                reply(ctx, WorkerEvent::error(e));
                return;
            }
        };

        reply(ctx, WorkerEvent::Started { name: config.name.clone(), target });

        let running = Arc::new(AtomicBool::new(true));
        self.running = Some(Arc::clone(&running));

        let run = fut::wrap_future::<_, Self>(run_load_test(config, running)).map(
            |result, act, ctx| {
                act.running = None;
                let event = match result {
                    Ok(report) => WorkerEvent::Finished { report },
                    Err(e) => WorkerEvent::error(e),
                };
                reply(ctx, event);
            },
        );
        ctx.spawn(run);
    }
}

impl Default for WsSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("websocket session started");
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some(running) = self.running.take() {
            running.store(false, Ordering::Relaxed);
            tracing::warn!("websocket session closed during a run, stopping users");
        }
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => self.start_run(&text, ctx),
            Ok(ws::Message::Ping(payload)) => ctx.pong(&payload),
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Err(e) => {
                tracing::warn!(error = %e, "websocket protocol error");
                ctx.stop();
            }
            _ => {}
        }
    }
}

pub async fn ws_handler(req: HttpRequest, stream: web::Payload) -> Result<HttpResponse, Error> {
    ws::start(WsSession::new(), &req, stream)
}
