//! Backward-Euler update for strongly coupled nodes.
//!
//! Each implicit node `i` with capacity `C_i` satisfies
//!
//! ```text
//!   (C_i/dt + Σ g_ik + Σ g_ij) T_i' − Σ g_ij T_j' = (C_i/dt) T_i + Σ g_ik T_k
//! ```
//!
//! where `k` runs over links to temperatures already known for the new time
//! level (explicit predictions, boundaries) and `j` over couplings to other
//! implicit nodes. The result is a small dense linear system.

use nalgebra::{DMatrix, DVector};

#[derive(Clone, Debug)]
struct Node {
    capacity: f64,
    temperature: f64,
    /// (conductance, known temperature)
    links: Vec<(f64, f64)>,
}

/// Linear system for one backward-Euler sub-step.
#[derive(Clone, Debug, Default)]
pub struct ImplicitSystem {
    nodes: Vec<Node>,
    /// (i, j, conductance) between implicit nodes
    couplings: Vec<(usize, usize, f64)>,
}

impl ImplicitSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an implicit node; returns its index in the solution vector.
    pub fn add_node(&mut self, capacity: f64, temperature: f64) -> usize {
        self.nodes.push(Node {
            capacity,
            temperature,
            links: Vec::new(),
        });
        self.nodes.len() - 1
    }

    /// Couple node `i` to a known temperature through `conductance` (W/K).
    pub fn link(&mut self, i: usize, conductance: f64, temperature: f64) -> &mut Self {
        self.nodes[i].links.push((conductance, temperature));
        self
    }

    /// Couple two implicit nodes.
    pub fn couple(&mut self, i: usize, j: usize, conductance: f64) -> &mut Self {
        self.couplings.push((i, j, conductance));
        self
    }

    /// Assemble `A x = b` for timestep `dt`.
    pub fn assemble(&self, dt: f64) -> (DMatrix<f64>, DVector<f64>) {
        let n = self.nodes.len();
        let mut a = DMatrix::<f64>::zeros(n, n);
        let mut b = DVector::<f64>::zeros(n);

        for (i, node) in self.nodes.iter().enumerate() {
            let storage = node.capacity / dt;
            a[(i, i)] = storage;
            b[i] = storage * node.temperature;
            for &(g, t_known) in &node.links {
                a[(i, i)] += g;
                b[i] += g * t_known;
            }
        }
        for &(i, j, g) in &self.couplings {
            a[(i, i)] += g;
            a[(j, j)] += g;
            a[(i, j)] -= g;
            a[(j, i)] -= g;
        }

        (a, b)
    }

    /// New-time-level temperatures, or `None` if the system is singular.
    pub fn solve(&self, dt: f64) -> Option<DVector<f64>> {
        let (a, b) = self.assemble(dt);
        a.lu().solve(&b)
    }
}
