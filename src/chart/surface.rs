use crate::domain::Candle;

use super::trace::{Trace, TraceBody, VolumeBar};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("trace index {index} out of range ({len} traces)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("trace '{0}' does not accept appended points")]
    NotExtendable(String),
    #[error("invalid trace '{name}': {reason}")]
    InvalidTrace { name: String, reason: String },
    #[error("invalid x range {0}..{1}")]
    InvalidRange(i64, i64),
}

/// The chart capabilities the overlay relies on.
///
/// `react` must be all-or-nothing: on error the previous trace list stays.
pub trait ChartSurface {
    fn traces(&self) -> &[Trace];

    /// Replace every trace at once.
    fn react(&mut self, traces: Vec<Trace>) -> Result<(), ChartError>;

    fn restyle_visibility(&mut self, index: usize, visible: bool) -> Result<(), ChartError>;

    /// Append one sample to the trace at `index`.
    fn extend_trace(&mut self, index: usize, candle: &Candle) -> Result<(), ChartError>;

    /// Visible time window in epoch ms. None shows everything.
    fn relayout_x_range(&mut self, range: Option<(i64, i64)>) -> Result<(), ChartError>;

    fn x_range(&self) -> Option<(i64, i64)>;
}

/// In-memory chart state. The egui chart view draws straight from it.
#[derive(Debug, Clone, Default)]
pub struct TraceStore {
    traces: Vec<Trace>,
    x_range: Option<(i64, i64)>,
}

impl TraceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate(trace: &Trace) -> Result<(), ChartError> {
        match &trace.body {
            TraceBody::Band { x, price, .. } => {
                if !price.is_finite() {
                    return Err(ChartError::InvalidTrace {
                        name: trace.name.clone(),
                        reason: format!("band price {price}"),
                    });
                }
                if x[0] > x[1] {
                    return Err(ChartError::InvalidTrace {
                        name: trace.name.clone(),
                        reason: "band ends before it starts".to_string(),
                    });
                }
                Ok(())
            }
            TraceBody::Candlestick(candles) => match candles.iter().find(|c| !c.is_finite()) {
                Some(c) => Err(ChartError::InvalidTrace {
                    name: trace.name.clone(),
                    reason: format!("non-finite candle at {}", c.timestamp_ms),
                }),
                None => Ok(()),
            },
            TraceBody::Volume(_) => Ok(()),
        }
    }
}

impl ChartSurface for TraceStore {
    fn traces(&self) -> &[Trace] {
        &self.traces
    }

    fn react(&mut self, traces: Vec<Trace>) -> Result<(), ChartError> {
        for trace in &traces {
            Self::validate(trace)?;
        }
        self.traces = traces;
        Ok(())
    }

    fn restyle_visibility(&mut self, index: usize, visible: bool) -> Result<(), ChartError> {
        let len = self.traces.len();
        let trace = self
            .traces
            .get_mut(index)
            .ok_or(ChartError::IndexOutOfRange { index, len })?;
        trace.visible = visible;
        Ok(())
    }

    fn extend_trace(&mut self, index: usize, candle: &Candle) -> Result<(), ChartError> {
        let len = self.traces.len();
        let trace = self
            .traces
            .get_mut(index)
            .ok_or(ChartError::IndexOutOfRange { index, len })?;

        match &mut trace.body {
            TraceBody::Candlestick(candles) => {
                if !candle.is_finite() {
                    return Err(ChartError::InvalidTrace {
                        name: trace.name.clone(),
                        reason: format!("non-finite candle at {}", candle.timestamp_ms),
                    });
                }
                candles.push(*candle);
            }
            TraceBody::Volume(bars) => bars.push(VolumeBar::from(candle)),
            TraceBody::Band { .. } => return Err(ChartError::NotExtendable(trace.name.clone())),
        }
        Ok(())
    }

    fn relayout_x_range(&mut self, range: Option<(i64, i64)>) -> Result<(), ChartError> {
        if let Some((start, end)) = range {
            if start > end {
                return Err(ChartError::InvalidRange(start, end));
            }
        }
        self.x_range = range;
        Ok(())
    }

    fn x_range(&self) -> Option<(i64, i64)> {
        self.x_range
    }
}
