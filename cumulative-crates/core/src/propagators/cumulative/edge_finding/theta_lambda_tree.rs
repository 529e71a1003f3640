use std::cmp::max;

use super::EnergyJob;
use super::TreeLayout;
use crate::cumulative_assert_simple;
use crate::propagators::cumulative::JobId;

/// A node of the [`ThetaLambdaTree`].
///
/// As opposed to the nodes in a Theta tree, these nodes also keep track of the energy and the
/// envelope when at most one job of Lambda is added to Theta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    energy: i64,
    envelope: i64,
    energy_bar: i64,
    envelope_bar: i64,
}

impl Node {
    fn empty() -> Self {
        Node {
            energy: 0,
            envelope: i64::MIN,
            energy_bar: 0,
            envelope_bar: i64::MIN,
        }
    }

    fn theta(energy: i64, envelope: i64) -> Self {
        Node {
            energy,
            envelope,
            energy_bar: energy,
            envelope_bar: envelope,
        }
    }

    fn lambda(energy: i64, envelope: i64) -> Self {
        Node {
            energy: 0,
            envelope: i64::MIN,
            energy_bar: energy,
            envelope_bar: envelope,
        }
    }
}

/// The result of tracing the envelope of Theta with one job of Lambda.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct LambdaTrace {
    /// The job of Lambda which is responsible for the envelope.
    pub(super) lambda_job: EnergyJob,
    /// The earliest start time of the set `Ω` of jobs of Theta which, together with the job of
    /// Lambda, determines the envelope.
    pub(super) est_omega: i32,
    /// The energy of `Ω`.
    pub(super) energy_omega: i64,
}

/// Which of the quantities of a node a trace follows.
#[derive(Debug, Clone, Copy)]
enum Traced {
    EnvelopeBar,
    EnergyBar,
}

/// A structure for efficiently calculating the energy envelope of a set of jobs Theta while
/// allowing at most one job of another (disjoint) set Lambda to be added.
///
/// The tree is stored in an array; all traversals are iterative.
#[derive(Debug, Clone)]
pub(super) struct ThetaLambdaTree {
    nodes: Vec<Node>,
    layout: TreeLayout,
    capacity: i64,
}

impl ThetaLambdaTree {
    /// Creates a tree for `jobs` in which all jobs are in Theta and Lambda is empty.
    pub(super) fn new(jobs: &[EnergyJob], capacity: i32) -> Self {
        let layout = TreeLayout::new(jobs);
        let mut tree = ThetaLambdaTree {
            nodes: vec![Node::empty(); layout.number_of_nodes()],
            layout,
            capacity: capacity as i64,
        };

        for index in 0..tree.layout.sorted_jobs.len() {
            let job = tree.layout.sorted_jobs[index];
            let position = tree.layout.leaf(job.id);
            tree.nodes[position] = Node::theta(job.energy(), tree.leaf_envelope(&job));
        }
        for position in (0..tree.layout.number_of_internal_nodes).rev() {
            tree.update(position);
        }
        tree
    }

    pub(super) fn envelope(&self) -> i64 {
        self.nodes[0].envelope
    }

    pub(super) fn envelope_bar(&self) -> i64 {
        self.nodes[0].envelope_bar
    }

    /// Moves `job` from Theta to Lambda.
    pub(super) fn move_to_lambda(&mut self, job: &EnergyJob) {
        let position = self.layout.leaf(job.id);
        cumulative_assert_simple!(self.nodes[position].envelope != i64::MIN);
        self.nodes[position] = Node::lambda(job.energy(), self.leaf_envelope(job));
        self.upheap(position);
    }

    /// Removes `job` from Lambda.
    pub(super) fn remove_from_lambda(&mut self, job: JobId) {
        let position = self.layout.leaf(job);
        cumulative_assert_simple!(self.nodes[position].energy == 0);
        self.nodes[position] = Node::empty();
        self.upheap(position);
    }

    /// The earliest start time of the jobs of Theta which determine the envelope.
    pub(super) fn envelope_start(&self) -> Option<i32> {
        if self.envelope() == i64::MIN {
            return None;
        }
        Some(self.layout.job_at(self.trace_envelope(0)).est)
    }

    /// Finds the job of Lambda responsible for the envelope with Lambda, together with the set of
    /// jobs of Theta which it was combined with.
    ///
    /// Returns `None` if the envelope with Lambda is not larger than the envelope of Theta.
    pub(super) fn trace_lambda(&self) -> Option<LambdaTrace> {
        if self.envelope_bar() <= self.envelope() {
            return None;
        }

        let mut position = 0;
        let mut traced = Traced::EnvelopeBar;
        let mut omega_start = None;

        while !self.layout.is_leaf(position) {
            let node = self.nodes[position];
            let left_position = TreeLayout::left_child(position);
            let right_position = TreeLayout::right_child(position);
            let left = self.nodes[left_position];
            let right = self.nodes[right_position];

            position = match traced {
                Traced::EnvelopeBar => {
                    if node.envelope_bar == right.envelope_bar {
                        right_position
                    } else if node.envelope_bar == left.envelope.saturating_add(right.energy_bar)
                    {
                        // Ω starts in the left subtree, the job of Lambda is in the right one
                        omega_start = Some(self.trace_envelope(left_position));
                        traced = Traced::EnergyBar;
                        right_position
                    } else {
                        left_position
                    }
                }
                Traced::EnergyBar => {
                    if node.energy_bar == left.energy_bar + right.energy {
                        left_position
                    } else {
                        right_position
                    }
                }
            };
        }

        let lambda_job = *self.layout.job_at(position);
        cumulative_assert_simple!(
            self.nodes[position].energy == 0 && self.nodes[position].energy_bar > 0,
            "the trace ends in a leaf of Lambda"
        );
        let est_omega = omega_start.map_or(lambda_job.est, |start| self.layout.job_at(start).est);
        let energy_omega =
            self.envelope_bar() - self.capacity * est_omega as i64 - lambda_job.energy();

        Some(LambdaTrace {
            lambda_job,
            est_omega,
            energy_omega,
        })
    }

    fn leaf_envelope(&self, job: &EnergyJob) -> i64 {
        self.capacity * job.est as i64 + job.energy()
    }

    /// Descends from `position` to the leaf which determines the envelope of Theta.
    fn trace_envelope(&self, mut position: usize) -> usize {
        while !self.layout.is_leaf(position) {
            let right = TreeLayout::right_child(position);
            position = if self.nodes[position].envelope == self.nodes[right].envelope {
                right
            } else {
                TreeLayout::left_child(position)
            };
        }
        position
    }

    fn update(&mut self, parent: usize) {
        let left = self.nodes[TreeLayout::left_child(parent)];
        let right = self.nodes[TreeLayout::right_child(parent)];

        self.nodes[parent] = Node {
            energy: left.energy + right.energy,
            envelope: max(right.envelope, left.envelope.saturating_add(right.energy)),
            energy_bar: max(
                left.energy_bar + right.energy,
                left.energy + right.energy_bar,
            ),
            envelope_bar: max(
                right.envelope_bar,
                max(
                    left.envelope.saturating_add(right.energy_bar),
                    left.envelope_bar.saturating_add(right.energy),
                ),
            ),
        };
    }

    fn upheap(&mut self, mut position: usize) {
        while position != 0 {
            position = TreeLayout::parent(position);
            self.update(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn all_jobs_start_in_theta() {
        let jobs = [job(0, 0, 5, 2, 1), job(1, 1, 5, 2, 1), job(2, 3, 5, 1, 1)];
        let tree = ThetaLambdaTree::new(&jobs, 1);

        // max(0 + 5, 1 + 3, 3 + 1)
        assert_eq!(tree.envelope(), 5);
        assert_eq!(tree.envelope_bar(), 5);
        assert_eq!(tree.envelope_start(), Some(0));
        assert_eq!(tree.trace_lambda(), None);
    }

    #[test]
    fn lambda_job_is_traced() {
        let jobs = [
            job(0, 0, 4, 2, 1),
            job(1, 0, 4, 2, 1),
            job(2, 1, 10, 3, 1),
            job(3, 5, 8, 1, 1),
        ];
        let mut tree = ThetaLambdaTree::new(&jobs, 1);
        tree.move_to_lambda(&jobs[2]);
        tree.move_to_lambda(&jobs[3]);

        // Theta = {0, 1}; adding job 2 gives max(0 + 4 + 3, 1 + 3) = 7 and adding job 3 gives 6
        assert_eq!(tree.envelope(), 4);
        assert_eq!(tree.envelope_bar(), 7);
        assert_eq!(
            tree.trace_lambda(),
            Some(LambdaTrace {
                lambda_job: jobs[2],
                est_omega: 0,
                energy_omega: 4,
            })
        );

        tree.remove_from_lambda(JobId::new(2));
        // Adding job 3 gives max(0 + 4 + 1, 5 + 1) = 6
        assert_eq!(
            tree.trace_lambda(),
            Some(LambdaTrace {
                lambda_job: jobs[3],
                est_omega: 5,
                energy_omega: 0,
            })
        );
    }
}
