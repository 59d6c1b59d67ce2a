use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use scrape_engine::{
    EngineEvent, EngineHandle, EventSink, ExportError, Exporter, FailureKind, ScrapeTransport,
    StreamSummary, TransportError,
};
use serde_json::{json, Value};

struct ScriptedTransport {
    chunks: Vec<&'static str>,
    fail_with: Option<FailureKind>,
}

#[async_trait::async_trait]
impl ScrapeTransport for ScriptedTransport {
    async fn stream_scrape(
        &self,
        _url: &str,
        sink: &dyn EventSink,
    ) -> Result<StreamSummary, TransportError> {
        for chunk in &self.chunks {
            sink.emit(EngineEvent::StreamText(chunk.to_string()));
        }
        match &self.fail_with {
            Some(kind) => Err(TransportError {
                kind: kind.clone(),
                message: "scripted failure".to_string(),
            }),
            None => Ok(StreamSummary {
                bytes: self.chunks.iter().map(|c| c.len() as u64).sum(),
                chunks: self.chunks.len(),
                encoding: "UTF-8".to_string(),
            }),
        }
    }
}

struct PanickingTransport;

#[async_trait::async_trait]
impl ScrapeTransport for PanickingTransport {
    async fn stream_scrape(
        &self,
        _url: &str,
        sink: &dyn EventSink,
    ) -> Result<StreamSummary, TransportError> {
        sink.emit(EngineEvent::StreamText("data: {}\n".to_string()));
        panic!("backend blew up mid-stream");
    }
}

struct PanickingExporter;

#[async_trait::async_trait]
impl Exporter for PanickingExporter {
    async fn export(&self, _payload: &Value) -> Result<PathBuf, ExportError> {
        panic!("exporter blew up");
    }
}

struct RecordingExporter;

#[async_trait::async_trait]
impl Exporter for RecordingExporter {
    async fn export(&self, payload: &Value) -> Result<PathBuf, ExportError> {
        if payload.get("rooms").is_some() {
            Ok(PathBuf::from("hotel_rooms.csv"))
        } else {
            Err(ExportError::HttpStatus(400))
        }
    }
}

fn drain_until_terminal(engine: &EngineHandle) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Ok(Some(event)) = engine.recv_timeout(Duration::from_secs(5)) {
        let terminal = matches!(
            event,
            EngineEvent::StreamFinished(_)
                | EngineEvent::StreamFailed(_)
                | EngineEvent::ExportFinished(_)
        );
        events.push(event);
        if terminal {
            break;
        }
    }
    events
}

fn engine_with(transport: ScriptedTransport) -> EngineHandle {
    EngineHandle::with_backends(Arc::new(transport), Arc::new(RecordingExporter))
}

#[test]
fn scrape_text_arrives_in_order_before_finish() {
    let engine = engine_with(ScriptedTransport {
        chunks: vec!["data: {\"step\":1}\n", "data: {\"step\":2}\n"],
        fail_with: None,
    });

    engine.scrape("https://hotel.example");
    let events = drain_until_terminal(&engine);

    assert_eq!(events.len(), 3);
    assert!(matches!(&events[0], EngineEvent::StreamText(t) if t.contains("\"step\":1")));
    assert!(matches!(&events[1], EngineEvent::StreamText(t) if t.contains("\"step\":2")));
    match &events[2] {
        EngineEvent::StreamFinished(summary) => assert_eq!(summary.chunks, 2),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn failed_scrape_ends_with_stream_failed() {
    let engine = engine_with(ScriptedTransport {
        chunks: vec!["data: {\"step\":1}\n"],
        fail_with: Some(FailureKind::Network),
    });

    engine.scrape("https://hotel.example");
    let events = drain_until_terminal(&engine);

    assert_eq!(events.len(), 2);
    match &events[1] {
        EngineEvent::StreamFailed(err) => assert_eq!(err.kind, FailureKind::Network),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn export_result_is_reported() {
    let engine = engine_with(ScriptedTransport {
        chunks: Vec::new(),
        fail_with: None,
    });

    engine.export(json!({"rooms": []}));
    match drain_until_terminal(&engine).pop() {
        Some(EngineEvent::ExportFinished(Ok(path))) => {
            assert_eq!(path, PathBuf::from("hotel_rooms.csv"))
        }
        other => panic!("unexpected event {other:?}"),
    }

    engine.export(json!({"unexpected": true}));
    assert!(matches!(
        drain_until_terminal(&engine).pop(),
        Some(EngineEvent::ExportFinished(Err(ExportError::HttpStatus(400))))
    ));
}

#[test]
fn panicking_transport_still_ends_with_stream_failed() {
    let engine =
        EngineHandle::with_backends(Arc::new(PanickingTransport), Arc::new(RecordingExporter));

    engine.scrape("https://hotel.example");
    let events = drain_until_terminal(&engine);

    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], EngineEvent::StreamText(_)));
    match &events[1] {
        EngineEvent::StreamFailed(err) => assert_eq!(err.kind, FailureKind::Aborted),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn panicking_exporter_still_reports_export_failure() {
    let engine = EngineHandle::with_backends(
        Arc::new(ScriptedTransport {
            chunks: Vec::new(),
            fail_with: None,
        }),
        Arc::new(PanickingExporter),
    );

    engine.export(json!({"rooms": []}));

    assert!(matches!(
        drain_until_terminal(&engine).pop(),
        Some(EngineEvent::ExportFinished(Err(ExportError::Aborted(_))))
    ));
}

#[test]
fn idle_engine_times_out_without_event() {
    let engine = engine_with(ScriptedTransport {
        chunks: Vec::new(),
        fail_with: None,
    });

    assert!(matches!(
        engine.recv_timeout(Duration::from_millis(20)),
        Ok(None)
    ));
}
