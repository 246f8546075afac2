use std::{
    mem,
    time::{Duration, Instant},
};

use sluice_protocol::UpsertEnvelope;

/// Ordered envelopes destined for one bulk request.
#[derive(Debug, Default)]
pub struct Batch {
    items: Vec<UpsertEnvelope>,
    bytes: usize,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, env: UpsertEnvelope) {
        self.bytes += env.encoded_len();
        self.items.push(env);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Size of the encoded bulk request body.
    pub fn bytes(&self) -> usize {
        self.bytes
    }

    pub fn iter(&self) -> impl Iterator<Item = &UpsertEnvelope> {
        self.items.iter()
    }

    /// NDJSON body for the bulk API.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.bytes);
        for env in &self.items {
            env.write_bulk_lines(&mut buf);
        }
        buf
    }
}

impl FromIterator<UpsertEnvelope> for Batch {
    fn from_iter<I: IntoIterator<Item = UpsertEnvelope>>(iter: I) -> Self {
        let mut batch = Batch::new();
        for env in iter {
            batch.push(env);
        }
        batch
    }
}

/// What the ticker should do next.
#[derive(Debug)]
pub enum Tick {
    /// The pending batch is old enough; dispatch it.
    Flush(Batch),
    /// Check again after this long.
    Wait(Duration),
}

/// Buffers envelopes and decides when the pending batch is sealed.
///
/// A batch is sealed when its size reaches `flush_bytes`, when it has been
/// open for `flush_interval`, or on [Accumulator::drain].
#[derive(Debug)]
pub struct Accumulator {
    flush_bytes: usize,
    flush_interval: Duration,
    pending: Batch,
    opened_at: Instant,
}

impl Accumulator {
    pub fn new(flush_bytes: usize, flush_interval: Duration) -> Self {
        Self::starting_at(flush_bytes, flush_interval, Instant::now())
    }

    fn starting_at(flush_bytes: usize, flush_interval: Duration, now: Instant) -> Self {
        Self {
            flush_bytes,
            flush_interval,
            pending: Batch::new(),
            opened_at: now,
        }
    }

    /// Add an envelope. Returns the sealed batch if this push filled it;
    /// the pushed envelope is always part of that batch.
    pub fn push(&mut self, env: UpsertEnvelope) -> Option<Batch> {
        self.pending.push(env);

        if self.pending.bytes() >= self.flush_bytes {
            Some(self.seal(Instant::now()))
        } else {
            None
        }
    }

    /// Time-based trigger, evaluated at `now`.
    pub fn poll(&mut self, now: Instant) -> Tick {
        let age = now.saturating_duration_since(self.opened_at);
        if age < self.flush_interval {
            return Tick::Wait(self.flush_interval - age);
        }

        if self.pending.is_empty() {
            // Nothing to send; restart the clock instead of spinning.
            self.opened_at = now;
            Tick::Wait(self.flush_interval)
        } else {
            Tick::Flush(self.seal(now))
        }
    }

    /// Seal whatever is pending, if anything.
    pub fn drain(&mut self) -> Option<Batch> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.seal(Instant::now()))
        }
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_bytes(&self) -> usize {
        self.pending.bytes()
    }

    fn seal(&mut self, now: Instant) -> Batch {
        self.opened_at = now;
        mem::take(&mut self.pending)
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
