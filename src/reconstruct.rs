//! Backward traversal of a label's ancestor chain.
//!
//! Recovers the visited node sequence and the charging schedule of a partial
//! path from the labels that produced it. None of these queries mutate
//! anything.

use std::fmt::{self, Debug};
use std::iter;

use itertools::Itertools;

use crate::label::Label;
use crate::node::NodeId;

/// Origin-to-destination route reconstructed from a terminal label.
#[derive(Clone, PartialEq)]
pub struct FeasibleRoute {
    /// Visited node ids, origin first.
    pub path: Vec<NodeId>,
    /// `(station, energy added)` per charging stop, oldest first.
    pub charging: Vec<(NodeId, f64)>,
    /// Key time of the terminal label.
    pub duration: f64,
}

impl Debug for FeasibleRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\nFeasibleRoute\n")?;
        f.write_str("Visiting: ")?;
        for node in &self.path {
            f.write_fmt(format_args!("{node}-"))?;
        }
        f.write_str("\n")?;
        for (station, amount) in &self.charging {
            f.write_fmt(format_args!("Charge {amount} at {station}\n"))?;
        }
        f.write_fmt(format_args!("Duration: {}\n", self.duration))?;
        Ok(())
    }
}

impl<'a> Label<'a> {
    /// Iterates from this label up to the root, inclusive.
    pub fn ancestors(&self) -> impl Iterator<Item = &Label<'a>> + '_ {
        iter::successors(Some(self), |label| label.parent())
    }

    /// Node ids from this label back to the origin.
    pub fn path(&self) -> Vec<NodeId> {
        self.ancestors().map(Label::node).collect()
    }

    /// Node ids visited since the most recent charging station, newest first.
    ///
    /// Collection stops once the parent's last visited station differs from
    /// this label's (or is absent), or the root is reached. Empty when no
    /// station has been visited.
    pub fn path_since_last_customer(&self) -> Vec<NodeId> {
        let Some(cs) = self.last_visited_cs() else {
            return Vec::new();
        };
        self.ancestors()
            .take_while(|label| label.last_visited_cs() == Some(cs))
            .map(Label::node)
            .collect()
    }

    /// Energy added at each charging station visit, oldest first.
    pub fn charging_amounts(&self) -> Vec<f64> {
        self.charging_stops().into_iter().map(|(_, amount)| amount).collect()
    }

    /// `(station, energy added)` for each charging station visit, oldest first.
    ///
    /// Consecutive labels sharing a last visited station form one visit. The
    /// amount is read from the newest label of the group, the first one met
    /// when walking back across the group boundary.
    pub fn charging_stops(&self) -> Vec<(NodeId, f64)> {
        let mut stops: Vec<(NodeId, f64)> = self
            .ancestors()
            .group_by(|label| label.last_visited_cs())
            .into_iter()
            .map_while(|(cs, mut group)| {
                let cs = cs?;
                let boundary = group.next()?;
                Some((cs, boundary.charge_since_last_cs()))
            })
            .collect();
        stops.reverse();
        stops
    }

    /// Origin-to-destination route with its charging schedule.
    pub fn route(&self) -> FeasibleRoute {
        let mut path = self.path();
        path.reverse();
        FeasibleRoute {
            path,
            charging: self.charging_stops(),
            duration: self.key_time(),
        }
    }

    fn charge_since_last_cs(&self) -> f64 {
        self.energy_consumed_since_last_cs() + self.first_supporting_soc() - self.soc_arr_to_last_cs()
    }
}
