//! 함수 호출 메트릭
//!
//! - `gateway_function_invocation_total{function_name, code}`: 호출 결과 카운터
//! - `gateway_functions_seconds{function_name}`: 호출 소요 시간 히스토그램
//!
//! 라우터는 [`Metrics`] 트레이트에만 의존하며 기록 실패는 호출 측에서 무시됩니다.

use std::sync::Arc;
use std::time::Duration;
use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};

pub trait Metrics: Send + Sync {
    fn record_invocation(&self, function_name: &str, code: u16) -> Result<(), prometheus::Error>;

    fn record_duration(&self, function_name: &str, elapsed: Duration) -> Result<(), prometheus::Error>;
}

#[derive(Clone)]
pub struct PrometheusMetrics {
    registry: Arc<Registry>,
    invocations: CounterVec,
    durations: HistogramVec,
}

impl PrometheusMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let invocations = CounterVec::new(
            Opts::new(
                "gateway_function_invocation_total",
                "Individual function metrics",
            ),
            &["function_name", "code"],
        )?;

        let durations = HistogramVec::new(
            HistogramOpts::new(
                "gateway_functions_seconds",
                "Function time taken",
            ),
            &["function_name"],
        )?;

        registry.register(Box::new(invocations.clone()))?;
        registry.register(Box::new(durations.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            invocations,
            durations,
        })
    }

    /// Prometheus 텍스트 형식으로 현재 메트릭을 렌더링합니다.
    pub fn gather_text(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    pub fn invocation_count(&self, function_name: &str, code: u16) -> f64 {
        self.invocations
            .get_metric_with_label_values(&[function_name, &code.to_string()])
            .map(|counter| counter.get())
            .unwrap_or(0.0)
    }

    pub fn duration_samples(&self, function_name: &str) -> u64 {
        self.durations
            .get_metric_with_label_values(&[function_name])
            .map(|histogram| histogram.get_sample_count())
            .unwrap_or(0)
    }
}

impl Metrics for PrometheusMetrics {
    fn record_invocation(&self, function_name: &str, code: u16) -> Result<(), prometheus::Error> {
        self.invocations
            .get_metric_with_label_values(&[function_name, &code.to_string()])?
            .inc();
        Ok(())
    }

    fn record_duration(&self, function_name: &str, elapsed: Duration) -> Result<(), prometheus::Error> {
        self.durations
            .get_metric_with_label_values(&[function_name])?
            .observe(elapsed.as_secs_f64());
        Ok(())
    }
}
