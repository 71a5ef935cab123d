//! Replaying a loaded delta on top of its baseline.

use std::hash::Hash;

use tracing::debug;

use crate::baseline::Baseline;
use crate::delta::{Delta, DeltaVisitor, Tracking};
use crate::error::CodecResult;
use crate::position::LocalPos;

/// Receives the entries [`restore`] replays into the live chunk.
///
/// Every method defaults to doing nothing; `()` ignores everything.
pub trait ReplaySink<S, B> {
    fn apply_change(&mut self, _pos: LocalPos, _state: &S) -> CodecResult<()> {
        Ok(())
    }

    fn apply_metadata(&mut self, _pos: LocalPos, _blob: &B) -> CodecResult<()> {
        Ok(())
    }

    /// Called once with every free record, in order.
    fn apply_free_records(&mut self, _records: &[B]) -> CodecResult<()> {
        Ok(())
    }
}

impl<S, B> ReplaySink<S, B> for () {}

/// What [`restore`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreOutcome {
    /// At least one change matched the baseline and was dropped.
    pub optimized: bool,
    pub replayed: usize,
    pub dropped: usize,
    pub metadata: usize,
    pub free_records: usize,
    /// Instructions whose palette id did not resolve.
    pub skipped: usize,
}

/// Replays `incoming` into `sink`, skipping changes the baseline already
/// holds, and returns the delta to keep for the next save.
///
/// A change whose value equals `baseline`'s value at that position is
/// redundant: it is neither replayed nor kept. Every other change, all
/// metadata and all free records are replayed and copied silently into the
/// returned delta, which shares `incoming`'s empty predicate. If anything was
/// dropped the returned delta is marked dirty, so the smaller form gets saved.
///
/// # Errors
///
/// Propagates the first error returned by `sink`.
pub fn restore<S, B, Bs, R>(
    incoming: &Delta<S, B>,
    baseline: &Bs,
    sink: &mut R,
) -> CodecResult<(Delta<S, B>, RestoreOutcome)>
where
    S: Clone + Eq + Hash,
    B: Clone + PartialEq,
    Bs: Baseline<S> + ?Sized,
    R: ReplaySink<S, B> + ?Sized,
{
    let mut restorer = Restorer {
        baseline,
        sink,
        outgoing: incoming.empty_like(),
        records: Vec::new(),
        outcome: RestoreOutcome::default(),
    };
    let stats = incoming.traverse(&mut restorer)?;

    let Restorer {
        sink,
        mut outgoing,
        records,
        mut outcome,
        ..
    } = restorer;
    sink.apply_free_records(&records)?;
    outgoing.set_free_records_with(&records, Tracking::Silent);
    outcome.free_records = records.len();
    outcome.skipped = stats.skipped;
    if outcome.optimized {
        outgoing.mark_dirty();
    }

    debug!(
        replayed = outcome.replayed,
        dropped = outcome.dropped,
        metadata = outcome.metadata,
        free_records = outcome.free_records,
        "restored delta"
    );
    Ok((outgoing, outcome))
}

struct Restorer<'a, S, B, Bs: ?Sized, R: ?Sized> {
    baseline: &'a Bs,
    sink: &'a mut R,
    outgoing: Delta<S, B>,
    records: Vec<B>,
    outcome: RestoreOutcome,
}

impl<S, B, Bs, R> DeltaVisitor<S, B> for Restorer<'_, S, B, Bs, R>
where
    S: Clone + Eq + Hash,
    B: Clone + PartialEq,
    Bs: Baseline<S> + ?Sized,
    R: ReplaySink<S, B> + ?Sized,
{
    fn visit_change(&mut self, pos: LocalPos, state: &S) -> CodecResult<()> {
        if self.baseline.value_at(pos) == *state {
            self.outcome.dropped += 1;
            self.outcome.optimized = true;
            return Ok(());
        }
        self.sink.apply_change(pos, state)?;
        self.outgoing
            .add_or_update_with(pos, state, Tracking::Silent)?;
        self.outcome.replayed += 1;
        Ok(())
    }

    fn visit_metadata(&mut self, pos: LocalPos, blob: &B) -> CodecResult<()> {
        self.sink.apply_metadata(pos, blob)?;
        self.outgoing
            .set_metadata_with(pos, blob.clone(), Tracking::Silent);
        self.outcome.metadata += 1;
        Ok(())
    }

    fn visit_free_record(&mut self, blob: &B) -> CodecResult<()> {
        self.records.push(blob.clone());
        Ok(())
    }
}
