//! Tracing infrastructure for masked execution.
//!
//! The tracer is a zero-cost abstraction: with `NoopTracer` every hook is an
//! `#[inline(always)]` empty function and the calls disappear. `PrintTracer`
//! renders one line per lane event; `EventLog` records the raw events.

use std::io::{self, Write};

use warpc_core::{Colors, OperatorKind, Resolution};

use super::memory::Pointer;
use super::value::Scalar;

/// Hooks called by [`LaneMachine`](super::LaneMachine) per lane.
///
/// Inactive lanes report `trace_skip` with the address they would have
/// touched; that address is never dereferenced.
pub trait Tracer {
    /// An active lane read `addr`.
    fn trace_load(&mut self, lane: usize, addr: Pointer, value: Scalar);

    /// An active lane wrote `addr`.
    fn trace_store(&mut self, lane: usize, addr: Pointer, value: Scalar);

    /// An inactive lane skipped its access to `addr`.
    fn trace_skip(&mut self, lane: usize, addr: Pointer);

    /// A lane chose its first (`true`) or second select operand.
    fn trace_select(&mut self, lane: usize, took_first: bool);

    /// A binary operator was resolved and evaluated.
    fn trace_binary(&mut self, op: OperatorKind, resolution: &Resolution);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_load(&mut self, _lane: usize, _addr: Pointer, _value: Scalar) {}

    #[inline(always)]
    fn trace_store(&mut self, _lane: usize, _addr: Pointer, _value: Scalar) {}

    #[inline(always)]
    fn trace_skip(&mut self, _lane: usize, _addr: Pointer) {}

    #[inline(always)]
    fn trace_select(&mut self, _lane: usize, _took_first: bool) {}

    #[inline(always)]
    fn trace_binary(&mut self, _op: OperatorKind, _resolution: &Resolution) {}
}

/// Tracer that collects human-readable trace lines.
pub struct PrintTracer {
    lines: Vec<String>,
    colors: Colors,
}

impl PrintTracer {
    pub fn new(colors: Colors) -> Self {
        Self {
            lines: Vec::new(),
            colors,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in &self.lines {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    /// Print the collected trace to stderr.
    pub fn print(&self) {
        for line in &self.lines {
            eprintln!("{line}");
        }
    }

    fn lane(&self, lane: usize, active: bool) -> String {
        let color = self.colors.lane(active);
        format!("{color}lane {lane:>2}{}", self.colors.reset)
    }
}

impl Tracer for PrintTracer {
    fn trace_load(&mut self, lane: usize, addr: Pointer, value: Scalar) {
        let c = self.colors;
        let line = format!(
            "{}  load   {}{addr}{}  = {value}",
            self.lane(lane, true),
            c.dim,
            c.reset
        );
        self.lines.push(line);
    }

    fn trace_store(&mut self, lane: usize, addr: Pointer, value: Scalar) {
        let c = self.colors;
        let line = format!(
            "{}  store  {}{addr}{} <- {value}",
            self.lane(lane, true),
            c.dim,
            c.reset
        );
        self.lines.push(line);
    }

    fn trace_skip(&mut self, lane: usize, addr: Pointer) {
        let c = self.colors;
        let line = format!(
            "{}  skip   {}{addr}{}",
            self.lane(lane, false),
            c.dim,
            c.reset
        );
        self.lines.push(line);
    }

    fn trace_select(&mut self, lane: usize, took_first: bool) {
        let pick = if took_first { "first" } else { "second" };
        let line = format!("{}  select {pick}", self.lane(lane, true));
        self.lines.push(line);
    }

    fn trace_binary(&mut self, op: OperatorKind, resolution: &Resolution) {
        let c = self.colors;
        self.lines.push(format!(
            "{}{op}{} computes in {}{}{} -> {}{}{}",
            c.blue, c.reset, c.blue, resolution.compute, c.reset, c.blue, resolution.result, c.reset
        ));
    }
}

/// One recorded tracer event.
#[derive(Clone, Debug, PartialEq)]
pub enum TraceEvent {
    Load { lane: usize, addr: Pointer, value: Scalar },
    Store { lane: usize, addr: Pointer, value: Scalar },
    Skip { lane: usize, addr: Pointer },
    Select { lane: usize, took_first: bool },
    Binary { op: OperatorKind, resolution: Resolution },
}

/// Tracer that records every event in order.
#[derive(Clone, Debug, Default)]
pub struct EventLog(Vec<TraceEvent>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[TraceEvent] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<TraceEvent> {
        self.0
    }

    /// Addresses actually read, in order.
    pub fn loaded_addresses(&self) -> Vec<Pointer> {
        self.0
            .iter()
            .filter_map(|e| match e {
                TraceEvent::Load { addr, .. } => Some(*addr),
                _ => None,
            })
            .collect()
    }
}

impl Tracer for EventLog {
    fn trace_load(&mut self, lane: usize, addr: Pointer, value: Scalar) {
        self.0.push(TraceEvent::Load { lane, addr, value });
    }

    fn trace_store(&mut self, lane: usize, addr: Pointer, value: Scalar) {
        self.0.push(TraceEvent::Store { lane, addr, value });
    }

    fn trace_skip(&mut self, lane: usize, addr: Pointer) {
        self.0.push(TraceEvent::Skip { lane, addr });
    }

    fn trace_select(&mut self, lane: usize, took_first: bool) {
        self.0.push(TraceEvent::Select { lane, took_first });
    }

    fn trace_binary(&mut self, op: OperatorKind, resolution: &Resolution) {
        self.0.push(TraceEvent::Binary {
            op,
            resolution: *resolution,
        });
    }
}
