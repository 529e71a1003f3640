use std::cmp::max;

use super::EnergyJob;
use super::TreeLayout;
use crate::cumulative_assert_simple;

/// A node of the [`ThetaTree`] which keeps track of the energy and the envelope of the jobs
/// below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    energy: i64,
    envelope: i64,
}

impl Node {
    fn empty() -> Self {
        Node {
            energy: 0,
            envelope: i64::MIN,
        }
    }
}

/// A structure for efficiently calculating the energy envelope of a set of jobs Theta.
///
/// The leaves hold the jobs in order of earliest start time; the envelope of an inner node is
/// the maximum of the envelope of its right child and the envelope of its left child increased
/// by the energy of its right child.
#[derive(Debug, Clone)]
pub(super) struct ThetaTree {
    nodes: Vec<Node>,
    layout: TreeLayout,
    capacity: i64,
}

impl ThetaTree {
    /// Creates a tree for `jobs` in which Theta is empty.
    pub(super) fn new(jobs: &[EnergyJob], capacity: i32) -> Self {
        let layout = TreeLayout::new(jobs);
        ThetaTree {
            nodes: vec![Node::empty(); layout.number_of_nodes()],
            layout,
            capacity: capacity as i64,
        }
    }

    pub(super) fn envelope(&self) -> i64 {
        self.nodes[0].envelope
    }

    pub(super) fn add(&mut self, job: &EnergyJob) {
        let position = self.layout.leaf(job.id);
        self.nodes[position] = Node {
            energy: job.energy(),
            envelope: self.capacity * job.est as i64 + job.energy(),
        };
        self.upheap(position);
    }

    /// The job in Theta whose earliest start time determines the envelope.
    ///
    /// The jobs of Theta in this leaf and the leaves to its right have an energy which equals the
    /// envelope minus `C` times the earliest start time of the returned job.
    pub(super) fn responsible_job(&self) -> Option<&EnergyJob> {
        if self.envelope() == i64::MIN {
            return None;
        }
        let position = self.trace_envelope(0);
        Some(self.layout.job_at(position))
    }

    /// Descends from `position` to the leaf which determines its envelope.
    fn trace_envelope(&self, mut position: usize) -> usize {
        while !self.layout.is_leaf(position) {
            let left = TreeLayout::left_child(position);
            let right = TreeLayout::right_child(position);
            position = if self.nodes[position].envelope == self.nodes[right].envelope {
                right
            } else {
                cumulative_assert_simple!(
                    self.nodes[position].envelope
                        == self.nodes[left]
                            .envelope
                            .saturating_add(self.nodes[right].energy)
                );
                left
            };
        }
        position
    }

    fn upheap(&mut self, mut position: usize) {
        while position != 0 {
            let parent = TreeLayout::parent(position);
            let left = self.nodes[TreeLayout::left_child(parent)];
            let right = self.nodes[TreeLayout::right_child(parent)];

            self.nodes[parent] = Node {
                energy: left.energy + right.energy,
                envelope: max(right.envelope, left.envelope.saturating_add(right.energy)),
            };
            position = parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagators::cumulative::JobId;

    fn job(id: u32, est: i32, lct: i32, duration: i32, demand: i32) -> EnergyJob {
        EnergyJob {
            id: JobId::new(id),
            est,
            lct,
            duration,
            demand,
        }
    }

    #[test]
    fn envelope_of_jobs() {
        let jobs = [
            job(0, 0, 10, 2, 1),
            job(1, 4, 10, 3, 2),
            job(2, 5, 10, 1, 2),
        ];
        let mut tree = ThetaTree::new(&jobs, 2);
        assert_eq!(tree.envelope(), i64::MIN);

        for job in jobs.iter() {
            tree.add(job);
        }

        // max(2 * 0 + 10, 2 * 4 + 8, 2 * 5 + 2)
        assert_eq!(tree.envelope(), 16);
        assert_eq!(tree.responsible_job().map(|job| job.id), Some(JobId::new(1)));
    }

    #[test]
    fn later_job_can_determine_envelope() {
        let jobs = [job(0, 0, 10, 1, 1), job(1, 6, 10, 2, 2)];
        let mut tree = ThetaTree::new(&jobs, 2);

        tree.add(&jobs[0]);
        assert_eq!(tree.envelope(), 1);
        assert_eq!(tree.responsible_job().map(|job| job.id), Some(JobId::new(0)));

        // max(2 * 0 + 5, 2 * 6 + 4)
        tree.add(&jobs[1]);
        assert_eq!(tree.envelope(), 16);
        assert_eq!(tree.responsible_job().map(|job| job.id), Some(JobId::new(1)));
    }
}
