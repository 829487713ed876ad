use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use typed_arena::Arena;

use crate::config::LabelingConfig;
use crate::error::LabelError;
use crate::node::NodeId;
use crate::soc::SocFunction;

/// Stable allocation index of a label inside its [`LabelArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(pub u64);

/// Everything the expansion driver decides about a new label.
///
/// The trip time is not passed separately: it is the first breakpoint time
/// of `soc`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelState {
    pub node: NodeId,
    pub key_time: f64,
    pub last_visited_cs: Option<NodeId>,
    pub soc_arr_to_last_cs: f64,
    pub energy_consumed_since_last_cs: f64,
    pub soc: SocFunction,
    pub time_last_arc: f64,
    pub energy_last_arc: f64,
}

/// Partial path state ending at a node, carrying a time/SOC resource profile.
///
/// Labels are immutable once allocated. Equality and hashing use the
/// [`LabelId`], so two labels are equal only if they are the same label.
pub struct Label<'a> {
    id: LabelId,
    state: LabelState,
    parent: Option<&'a Label<'a>>,
}

impl<'a> Label<'a> {
    pub fn id(&self) -> LabelId {
        self.id
    }

    pub fn node(&self) -> NodeId {
        self.state.node
    }

    pub fn key_time(&self) -> f64 {
        self.state.key_time
    }

    /// Elapsed time since the last charge event (or trip start).
    pub fn trip_time(&self) -> f64 {
        self.state.soc.first_time()
    }

    pub fn last_visited_cs(&self) -> Option<NodeId> {
        self.state.last_visited_cs
    }

    pub fn soc_arr_to_last_cs(&self) -> f64 {
        self.state.soc_arr_to_last_cs
    }

    pub fn energy_consumed_since_last_cs(&self) -> f64 {
        self.state.energy_consumed_since_last_cs
    }

    pub fn soc_function(&self) -> &SocFunction {
        &self.state.soc
    }

    pub fn time_last_arc(&self) -> f64 {
        self.state.time_last_arc
    }

    pub fn energy_last_arc(&self) -> f64 {
        self.state.energy_last_arc
    }

    pub fn parent(&self) -> Option<&'a Label<'a>> {
        self.parent
    }

    pub fn first_supporting_soc(&self) -> f64 {
        self.state.soc.first_soc()
    }

    pub fn last_supporting_soc(&self) -> f64 {
        self.state.soc.last_soc()
    }

    pub fn num_supporting_points(&self) -> usize {
        self.state.soc.num_points()
    }

    /// SOC achievable at `time`; negative infinity before the trip time.
    pub fn evaluate(&self, time: f64) -> f64 {
        self.state.soc.evaluate(time)
    }

    /// Resource extension function dominance.
    ///
    /// `self` dominates `other` iff it has no larger trip time, no smaller
    /// final SOC, and at every breakpoint time of either label reaches at
    /// least the SOC of `other`. Both labels must sit at the same node.
    pub fn dominates(&self, other: &Label<'_>) -> Result<bool, LabelError> {
        if self.node() != other.node() {
            return Err(LabelError::NodeMismatch {
                expected: self.node(),
                found: other.node(),
            });
        }
        if self.trip_time() > other.trip_time() {
            return Ok(false);
        }
        if self.last_supporting_soc() < other.last_supporting_soc() {
            return Ok(false);
        }
        let times = self.soc_function().times().iter();
        let other_times = other.soc_function().times().iter();
        let dominated_everywhere = times
            .chain(other_times)
            .all(|&t| self.evaluate(t) >= other.evaluate(t));
        Ok(dominated_everywhere)
    }

    /// Processing priority: earlier key time first, then larger initial SOC.
    pub fn priority(&self) -> LabelPriority {
        LabelPriority {
            key_time: self.key_time(),
            first_soc: self.first_supporting_soc(),
        }
    }

    /// Compares two labels by [`LabelPriority`].
    pub fn cmp_priority(&self, other: &Label<'_>) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialEq for Label<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Label<'_> {}

impl Hash for Label<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Label<'_> {
    // only the parent's id, the chain itself can be arbitrarily deep
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Label")
            .field("id", &self.id)
            .field("node", &self.node())
            .field("key_time", &self.key_time())
            .field("parent", &self.parent.map(Label::id))
            .finish()
    }
}

impl fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---- Label for node {}", self.node())?;
        writeln!(f, "keyTime = {}\t tripTime = {}", self.key_time(), self.trip_time())?;
        writeln!(
            f,
            "timeLastArc = {}\t energyLastArc = {}",
            self.time_last_arc(),
            self.energy_last_arc()
        )?;
        match self.last_visited_cs() {
            Some(cs) => write!(f, "lastVisitedCS = {cs}\t")?,
            None => write!(f, "lastVisitedCS = -\t")?,
        }
        writeln!(f, "socAtArrLastCS = {}", self.soc_arr_to_last_cs())?;
        writeln!(
            f,
            "energyConsumedSinceLastCS = {}",
            self.energy_consumed_since_last_cs()
        )?;
        let soc = self.soc_function();
        writeln!(f, "Supporting points")?;
        writeln!(f, "{:?}", soc.times())?;
        writeln!(f, "{:?}", soc.socs())?;
        writeln!(f, "Slope")?;
        writeln!(f, "{:?}", soc.slope())?;
        writeln!(f, "Intercept")?;
        writeln!(f, "{:?}", soc.y_intercept())?;
        writeln!(f, "Path")?;
        write!(f, "{:?}", self.path())
    }
}

/// Strict total processing order of labels.
///
/// Smaller is processed first: ascending `key_time`, ties broken by
/// descending first-breakpoint SOC. Uses `f64::total_cmp` so the order is
/// total even in the presence of infinities.
#[derive(Debug, Clone, Copy)]
pub struct LabelPriority {
    pub key_time: f64,
    pub first_soc: f64,
}

impl Ord for LabelPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key_time
            .total_cmp(&other.key_time)
            .then_with(|| other.first_soc.total_cmp(&self.first_soc))
    }
}

impl PartialOrd for LabelPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for LabelPriority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LabelPriority {}

/// Bulk storage for all labels of one route-instance solve.
///
/// Parents are plain references into the arena; everything is released
/// together when the arena is dropped.
pub struct LabelArena<'a> {
    labels: Arena<Label<'a>>,
    next_id: Cell<u64>,
    battery_capacity: f64,
}

impl<'a> LabelArena<'a> {
    pub fn new(config: &LabelingConfig) -> Self {
        Self {
            labels: Arena::with_capacity(config.queue_capacity),
            next_id: Cell::new(0),
            battery_capacity: config.battery_capacity.unwrap_or(f64::INFINITY),
        }
    }

    /// Allocates a label extending `parent` (or a root label if `None`).
    pub fn alloc(
        &'a self,
        state: LabelState,
        parent: Option<&'a Label<'a>>,
    ) -> Result<&'a Label<'a>, LabelError> {
        let max_soc = state.soc.last_soc();
        if max_soc > self.battery_capacity {
            return Err(LabelError::SocAboveCapacity {
                soc: max_soc,
                capacity: self.battery_capacity,
            });
        }
        let min_soc = state.soc.first_soc();
        if min_soc < 0.0 {
            return Err(LabelError::NegativeSoc { soc: min_soc });
        }
        let id = LabelId(self.next_id.get());
        let next = id.0.checked_add(1).ok_or(LabelError::LabelIdsExhausted)?;
        self.next_id.set(next);
        tracing::trace!(label = id.0, node = state.node, parent = ?parent.map(Label::id), "allocated label");
        return Ok(self.labels.alloc(Label { id, state, parent }));
    }

    /// Number of labels allocated so far.
    pub fn len(&self) -> usize {
        usize::try_from(self.next_id.get()).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
