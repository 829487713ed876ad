//! Instance data consumed by the expansion driver: arc costs, service times
//! and the piecewise-linear charging functions of the stations.

use std::collections::HashMap;

use itertools::Itertools;

use crate::error::InstanceError;
use crate::node::{Node, NodeId};
use crate::soc::SocFunction;

/// Charging curve of one station type: SOC reached after charging for a
/// given time from empty. Concave and strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargingFunction {
    curve: SocFunction,
}

impl ChargingFunction {
    pub fn new(times: Vec<f64>, socs: Vec<f64>) -> Result<Self, InstanceError> {
        let curve = SocFunction::from_points(times, socs)?;
        if let Some((index, _)) = curve.socs().iter().tuple_windows().find_position(|(a, b)| a >= b) {
            return Err(InstanceError::FlatChargingSegment { index: index + 1 });
        }
        Ok(Self { curve })
    }

    pub fn curve(&self) -> &SocFunction {
        &self.curve
    }

    /// Index of the segment whose SOC range contains `soc`.
    ///
    /// At or above the top breakpoint this is the last segment.
    pub fn segment(&self, soc: f64) -> Result<usize, InstanceError> {
        let socs = self.curve.socs();
        let k = socs.partition_point(|&s| s <= soc);
        if k == 0 {
            return Err(InstanceError::SocBelowFunction { soc, min: socs[0] });
        }
        Ok((k - 1).min(socs.len() - 2))
    }

    /// Charging rate at `soc`.
    pub fn slope_at(&self, soc: f64) -> Result<f64, InstanceError> {
        Ok(self.curve.slope()[self.segment(soc)?])
    }

    /// Rate of the first (fastest) segment.
    pub fn first_slope(&self) -> f64 {
        self.curve.slope()[0]
    }

    /// Charging time needed to reach `soc` from the bottom of the curve.
    pub fn time_at_soc(&self, soc: f64) -> Result<f64, InstanceError> {
        let curve = &self.curve;
        if soc > curve.last_soc() {
            return Err(InstanceError::SocBeyondFunction {
                soc,
                max: curve.last_soc(),
            });
        }
        if soc.is_nan() || soc < curve.first_soc() {
            return Err(InstanceError::SocBelowFunction {
                soc,
                min: curve.first_soc(),
            });
        }
        // first segment whose upper end reaches soc
        let b = curve.socs()[1..].partition_point(|&s| s < soc);
        Ok((soc - curve.y_intercept()[b]) / curve.slope()[b])
    }

    /// Time to charge from `from_soc` up to `to_soc`.
    pub fn charge_time(&self, from_soc: f64, to_soc: f64) -> Result<f64, InstanceError> {
        Ok(self.time_at_soc(to_soc)? - self.time_at_soc(from_soc)?)
    }
}

/// A fixed-route vehicle charging instance.
#[derive(Debug, Clone)]
pub struct FrvcpInstance {
    nodes: Vec<Node>,
    time_matrix: Vec<Vec<f64>>,
    energy_matrix: Vec<Vec<f64>>,
    process_times: Vec<f64>,
    max_q: f64,
    charging_functions: Vec<ChargingFunction>,
    cs_types: HashMap<NodeId, usize>,
}

impl FrvcpInstance {
    /// Builds an instance. `nodes[i].id` must be `i`; matrices are indexed by
    /// node id; `cs_types` maps every charging station to an index into
    /// `charging_functions`.
    pub fn new(
        nodes: Vec<Node>,
        time_matrix: Vec<Vec<f64>>,
        energy_matrix: Vec<Vec<f64>>,
        process_times: Vec<f64>,
        max_q: f64,
        charging_functions: Vec<ChargingFunction>,
        cs_types: HashMap<NodeId, usize>,
    ) -> Result<Self, InstanceError> {
        let n = nodes.len();
        if let Some((index, node)) = nodes.iter().enumerate().find(|(i, node)| node.id != *i) {
            return Err(InstanceError::NodeIdMismatch { index, id: node.id });
        }
        check_square("time_matrix", &time_matrix, n)?;
        check_square("energy_matrix", &energy_matrix, n)?;
        if process_times.len() != n {
            return Err(InstanceError::MatrixShape {
                what: "process_times",
                expected: n,
                found: process_times.len(),
            });
        }
        for node in nodes.iter().filter(|node| node.is_charging_station()) {
            match cs_types.get(&node.id) {
                Some(&cs_type) if cs_type < charging_functions.len() => {}
                Some(&cs_type) => {
                    return Err(InstanceError::UnknownChargingType {
                        node: node.id,
                        cs_type,
                    })
                }
                None => return Err(InstanceError::MissingChargingType(node.id)),
            }
        }
        if let Some(&id) = cs_types.keys().find(|&&id| nodes.get(id).map_or(true, |node| !node.is_charging_station())) {
            return Err(InstanceError::NotAChargingStation(id));
        }
        Ok(Self {
            nodes,
            time_matrix,
            energy_matrix,
            process_times,
            max_q,
            charging_functions,
            cs_types,
        })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, InstanceError> {
        self.nodes.get(id).ok_or(InstanceError::UnknownNode(id))
    }

    /// Battery capacity.
    pub fn max_q(&self) -> f64 {
        self.max_q
    }

    pub fn arc_time(&self, from: NodeId, to: NodeId) -> Result<f64, InstanceError> {
        lookup(&self.time_matrix, from, to)
    }

    pub fn arc_energy(&self, from: NodeId, to: NodeId) -> Result<f64, InstanceError> {
        lookup(&self.energy_matrix, from, to)
    }

    /// Service time at a node.
    pub fn process_time(&self, node: NodeId) -> Result<f64, InstanceError> {
        self.process_times
            .get(node)
            .copied()
            .ok_or(InstanceError::UnknownNode(node))
    }

    pub fn charging_function(&self, node: NodeId) -> Result<&ChargingFunction, InstanceError> {
        if !self.node(node)?.is_charging_station() {
            return Err(InstanceError::NotAChargingStation(node));
        }
        let cs_type = self.cs_types[&node];
        Ok(&self.charging_functions[cs_type])
    }

    pub fn segment(&self, node: NodeId, soc: f64) -> Result<usize, InstanceError> {
        self.charging_function(node)?.segment(soc)
    }

    pub fn slope(&self, node: NodeId, soc: f64) -> Result<f64, InstanceError> {
        self.charging_function(node)?.slope_at(soc)
    }

    /// Time needed at station `node` to charge from `from_soc` to `to_soc`.
    pub fn charge_time(&self, node: NodeId, from_soc: f64, to_soc: f64) -> Result<f64, InstanceError> {
        self.charging_function(node)?.charge_time(from_soc, to_soc)
    }

    /// True if station `a` charges faster than station `b` on their first
    /// segments.
    pub fn is_cs_faster(&self, a: NodeId, b: NodeId) -> Result<bool, InstanceError> {
        let rate_a = self.charging_function(a)?.first_slope();
        let rate_b = self.charging_function(b)?.first_slope();
        Ok(rate_a > rate_b)
    }
}

fn check_square(what: &'static str, matrix: &[Vec<f64>], n: usize) -> Result<(), InstanceError> {
    if matrix.len() != n {
        return Err(InstanceError::MatrixShape {
            what,
            expected: n,
            found: matrix.len(),
        });
    }
    match matrix.iter().find(|row| row.len() != n) {
        Some(row) => Err(InstanceError::MatrixShape {
            what,
            expected: n,
            found: row.len(),
        }),
        None => Ok(()),
    }
}

fn lookup(matrix: &[Vec<f64>], from: NodeId, to: NodeId) -> Result<f64, InstanceError> {
    let row = matrix.get(from).ok_or(InstanceError::UnknownNode(from))?;
    row.get(to).copied().ok_or(InstanceError::UnknownNode(to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;
    use approx::assert_relative_eq;

    fn fast() -> ChargingFunction {
        ChargingFunction::new(vec![0.0, 1.0, 3.0], vec![0.0, 8.0, 12.0]).unwrap()
    }

    fn slow() -> ChargingFunction {
        ChargingFunction::new(vec![0.0, 4.0, 10.0], vec![0.0, 8.0, 12.0]).unwrap()
    }

    fn instance() -> FrvcpInstance {
        let nodes = vec![
            Node::new(0, "depot", NodeType::Depot),
            Node::new(1, "customer", NodeType::Customer),
            Node::new(2, "cs-fast", NodeType::ChargingStation),
            Node::new(3, "cs-slow", NodeType::ChargingStation),
        ];
        let time = vec![
            vec![0.0, 1.0, 2.0, 3.0],
            vec![1.0, 0.0, 1.5, 2.5],
            vec![2.0, 1.5, 0.0, 1.0],
            vec![3.0, 2.5, 1.0, 0.0],
        ];
        let energy = time.iter().map(|row| row.iter().map(|t| t * 2.0).collect::<Vec<f64>>()).collect();
        FrvcpInstance::new(
            nodes,
            time,
            energy,
            vec![0.0, 0.5, 0.0, 0.0],
            12.0,
            vec![fast(), slow()],
            HashMap::from([(2, 0), (3, 1)]),
        )
        .unwrap()
    }

    #[test]
    fn segment_lookup() {
        let f = fast();
        assert_eq!(f.segment(0.0), Ok(0));
        assert_eq!(f.segment(7.9), Ok(0));
        assert_eq!(f.segment(8.0), Ok(1));
        assert_eq!(f.segment(12.0), Ok(1));
        assert_eq!(f.segment(-1.0), Err(InstanceError::SocBelowFunction { soc: -1.0, min: 0.0 }));
        assert_relative_eq!(f.slope_at(10.0).unwrap(), 2.0);
    }

    #[test]
    fn inverse_charging_time() {
        let f = fast();
        assert_relative_eq!(f.time_at_soc(4.0).unwrap(), 0.5);
        assert_relative_eq!(f.time_at_soc(8.0).unwrap(), 1.0);
        assert_relative_eq!(f.time_at_soc(10.0).unwrap(), 2.0);
        assert_relative_eq!(f.charge_time(4.0, 10.0).unwrap(), 1.5);
        assert_eq!(
            f.time_at_soc(12.5),
            Err(InstanceError::SocBeyondFunction { soc: 12.5, max: 12.0 })
        );
        assert!(matches!(
            f.time_at_soc(f64::NAN),
            Err(InstanceError::SocBelowFunction { soc, .. }) if soc.is_nan()
        ));
    }

    #[test]
    fn flat_charging_curve_is_rejected() {
        assert_eq!(
            ChargingFunction::new(vec![0.0, 1.0, 2.0], vec![0.0, 4.0, 4.0]),
            Err(InstanceError::FlatChargingSegment { index: 2 })
        );
    }

    #[test]
    fn instance_queries() {
        let inst = instance();
        assert_eq!(inst.arc_time(1, 2), Ok(1.5));
        assert_eq!(inst.arc_energy(1, 2), Ok(3.0));
        assert_eq!(inst.process_time(1), Ok(0.5));
        assert_eq!(inst.arc_time(0, 9), Err(InstanceError::UnknownNode(9)));
        assert_relative_eq!(inst.charge_time(3, 0.0, 8.0).unwrap(), 4.0);
        assert_eq!(inst.segment(2, 9.0), Ok(1));
        assert_relative_eq!(inst.slope(3, 1.0).unwrap(), 2.0);
        assert_eq!(inst.max_q(), 12.0);
    }

    #[test]
    fn faster_station() {
        let inst = instance();
        assert_eq!(inst.is_cs_faster(2, 3), Ok(true));
        assert_eq!(inst.is_cs_faster(3, 2), Ok(false));
        assert_eq!(inst.is_cs_faster(1, 2), Err(InstanceError::NotAChargingStation(1)));
    }

    #[test]
    fn station_without_type_is_rejected() {
        let nodes = vec![
            Node::new(0, "depot", NodeType::Depot),
            Node::new(1, "cs", NodeType::ChargingStation),
        ];
        let square = vec![vec![0.0; 2]; 2];
        let err = FrvcpInstance::new(nodes, square.clone(), square, vec![0.0; 2], 10.0, vec![fast()], HashMap::new())
            .unwrap_err();
        assert_eq!(err, InstanceError::MissingChargingType(1));
    }

    #[test]
    fn rejects_inconsistent_instances() {
        let nodes = vec![
            Node::new(0, "depot", NodeType::Depot),
            Node::new(1, "cs", NodeType::ChargingStation),
        ];
        let square = vec![vec![0.0; 2]; 2];
        let err = FrvcpInstance::new(
            nodes.clone(),
            vec![vec![0.0; 2]],
            square.clone(),
            vec![0.0; 2],
            10.0,
            vec![fast()],
            HashMap::from([(1, 0)]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            InstanceError::MatrixShape {
                what: "time_matrix",
                expected: 2,
                found: 1
            }
        );

        let err = FrvcpInstance::new(
            nodes.clone(),
            square.clone(),
            square.clone(),
            vec![0.0; 2],
            10.0,
            vec![fast()],
            HashMap::from([(1, 3)]),
        )
        .unwrap_err();
        assert_eq!(err, InstanceError::UnknownChargingType { node: 1, cs_type: 3 });

        let err = FrvcpInstance::new(
            nodes,
            square.clone(),
            square,
            vec![0.0; 2],
            10.0,
            vec![fast()],
            HashMap::from([(1, 0), (0, 0)]),
        )
        .unwrap_err();
        assert_eq!(err, InstanceError::NotAChargingStation(0));
    }
}
