use crate::rng::Rng;
use crate::special::normal_cdf;

/// Signed regulatory network: `a[i][j]` is the interaction of regulator `i`
/// on target `j` (+1 activation, -1 inhibition, 0 none). Flat row-major
/// storage like the board grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjMatrix {
    data: Vec<i8>,
    n: usize,
}

impl AdjMatrix {
    pub fn new(n: usize) -> Self {
        Self {
            data: vec![0; n * n],
            n,
        }
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> i8 {
        self.data[i * self.n + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, v: i8) {
        self.data[i * self.n + j] = v;
    }

    /// Synthesized test network: every off-diagonal entry is an edge with
    /// probability `density`, inhibitory with probability
    /// `inhibitory_fraction`.
    pub fn random(n: usize, density: f32, inhibitory_fraction: f32, rng: &mut Rng) -> Self {
        let mut m = Self::new(n);
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                if rng.next_f32() < density {
                    let sign = if rng.next_f32() < inhibitory_fraction {
                        -1
                    } else {
                        1
                    };
                    m.set(i, j, sign);
                }
            }
        }
        m
    }

    /// All entries permuted uniformly across the whole matrix (the null
    /// model: same edge multiset, random wiring).
    pub fn shuffled(&self, rng: &mut Rng) -> Self {
        let mut data = self.data.clone();
        rng.shuffle(&mut data);
        Self { data, n: self.n }
    }

    /// Genes that regulate at least one target.
    pub fn transcription_factors(&self) -> usize {
        (0..self.n)
            .filter(|&i| (0..self.n).any(|j| self.get(i, j) != 0))
            .count()
    }

    pub fn activatory(&self) -> usize {
        self.data.iter().filter(|&&v| v > 0).count()
    }

    pub fn inhibitory(&self) -> usize {
        self.data.iter().filter(|&&v| v < 0).count()
    }

    /// Genes no other gene regulates (all-zero column).
    pub fn non_regulated(&self) -> usize {
        (0..self.n)
            .filter(|&j| (0..self.n).all(|i| self.get(i, j) == 0))
            .count()
    }

    /// Symmetrized |a| + |a|^T with the diagonal cleared; 2 marks a mutual
    /// (bidirectional) interaction.
    fn total_interactions(&self) -> Vec<u8> {
        let n = self.n;
        let mut total = vec![0u8; n * n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    total[i * n + j] = self.get(i, j).unsigned_abs() + self.get(j, i).unsigned_abs();
                }
            }
        }
        total
    }

    /// Count of matrix cells marking a mutual interaction. Each mutual pair
    /// contributes two cells, one per direction.
    pub fn mutual_interactions(&self) -> usize {
        self.total_interactions().iter().filter(|&&v| v == 2).count()
    }

    /// Undirected adjacency: 1 when any interaction exists in either
    /// direction, diagonal zero.
    pub fn any_interaction(&self) -> Vec<u8> {
        self.total_interactions()
            .iter()
            .map(|&v| (v > 0) as u8)
            .collect()
    }

    /// Common-neighbour matrix: entry (i, j) counts genes interacting with
    /// both i and j (square of the undirected adjacency).
    pub fn common_neighbours(&self) -> Vec<u32> {
        let n = self.n;
        let b = self.any_interaction();
        let mut cn = vec![0u32; n * n];
        for i in 0..n {
            for j in 0..n {
                let mut sum = 0u32;
                for k in 0..n {
                    sum += (b[i * n + k] * b[k * n + j]) as u32;
                }
                cn[i * n + j] = sum;
            }
        }
        cn
    }

    /// Strict-upper-triangle pairing of (common neighbours, interacts?) per
    /// gene pair, the data behind the neighbour-rule histogram.
    pub fn neighbour_interaction_pairs(&self) -> Vec<(u32, u8)> {
        let n = self.n;
        let b = self.any_interaction();
        let cn = self.common_neighbours();
        let mut pairs = Vec::with_capacity(n.saturating_sub(1) * n / 2);
        for i in 0..n {
            for j in i + 1..n {
                pairs.push((cn[i * n + j], b[i * n + j]));
            }
        }
        pairs
    }

    /// Fraction of gene pairs that interact, as a function of their
    /// common-neighbour count. Bins with no pairs are omitted.
    pub fn neighbour_rule_curve(&self) -> (Vec<f64>, Vec<f64>) {
        let pairs = self.neighbour_interaction_pairs();
        let max_cn = pairs.iter().map(|&(c, _)| c).max().unwrap_or(0) as usize;
        let mut totals = vec![0usize; max_cn + 1];
        let mut interacting = vec![0usize; max_cn + 1];
        for (cn, interacts) in pairs {
            totals[cn as usize] += 1;
            interacting[cn as usize] += interacts as usize;
        }
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for c in 0..=max_cn {
            if totals[c] > 0 {
                xs.push(c as f64);
                ys.push(interacting[c] as f64 / totals[c] as f64);
            }
        }
        (xs, ys)
    }

    /// Diamond motifs: for every ordered mutual pair (Y, W), count gene
    /// pairs (X, Z) with Y->X and X->W strictly one-way, Y->Z one-way, and
    /// Z otherwise unconnected to W and X, all four genes distinct.
    pub fn count_motifs(&self) -> usize {
        let n = self.n;
        let total = self.total_interactions();
        let mut motifs = 0;
        for y in 0..n {
            for w in 0..n {
                if total[y * n + w] != 2 {
                    continue;
                }
                for x in 0..n {
                    if x == y || x == w {
                        continue;
                    }
                    if self.get(y, x) == 0
                        || self.get(x, y) != 0
                        || self.get(x, w) == 0
                        || self.get(w, x) != 0
                    {
                        continue;
                    }
                    for z in 0..n {
                        if z == y || z == w || z == x {
                            continue;
                        }
                        if self.get(y, z) != 0
                            && self.get(z, y) == 0
                            && self.get(w, z) == 0
                            && self.get(z, w) == 0
                            && self.get(x, z) == 0
                            && self.get(z, x) == 0
                        {
                            motifs += 1;
                        }
                    }
                }
            }
        }
        motifs
    }
}

/// Motif count of the real network against a permutation null model.
#[derive(Clone, Debug)]
pub struct MotifEnrichment {
    pub observed: usize,
    pub null_counts: Vec<usize>,
    pub null_mean: f64,
    pub null_std: f64,
    pub z_score: f64,
    /// One-sided: probability of a null count at least this extreme.
    pub p_value: f64,
}

/// Shuffle the matrix `randomizations` times, counting motifs each time,
/// and score the observed count against the null distribution.
pub fn motif_enrichment(m: &AdjMatrix, randomizations: usize, rng: &mut Rng) -> MotifEnrichment {
    let observed = m.count_motifs();
    let null_counts: Vec<usize> = (0..randomizations)
        .map(|_| m.shuffled(rng).count_motifs())
        .collect();

    let len = null_counts.len().max(1) as f64;
    let null_mean = null_counts.iter().sum::<usize>() as f64 / len;
    let variance = null_counts
        .iter()
        .map(|&c| {
            let d = c as f64 - null_mean;
            d * d
        })
        .sum::<f64>()
        / len;
    let null_std = variance.sqrt();

    let z_score = if null_std > 0.0 {
        (observed as f64 - null_mean) / null_std
    } else {
        0.0
    };
    let p_value = 1.0 - normal_cdf(z_score);

    MotifEnrichment {
        observed,
        null_counts,
        null_mean,
        null_std,
        z_score,
        p_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One diamond: Y=0 <-> W=1 mutual, Y->X=2, X->W, Y->Z=3.
    fn diamond() -> AdjMatrix {
        let mut m = AdjMatrix::new(4);
        m.set(0, 1, 1);
        m.set(1, 0, 1);
        m.set(0, 2, 1);
        m.set(2, 1, 1);
        m.set(0, 3, 1);
        m
    }

    #[test]
    fn basic_statistics_on_a_known_network() {
        let m = diamond();
        assert_eq!(m.transcription_factors(), 3);
        assert_eq!(m.activatory(), 5);
        assert_eq!(m.inhibitory(), 0);
        assert_eq!(m.non_regulated(), 0);
        // One mutual pair, counted once per direction.
        assert_eq!(m.mutual_interactions(), 2);
    }

    #[test]
    fn inhibitory_edges_are_counted_by_sign() {
        let mut m = AdjMatrix::new(3);
        m.set(0, 1, -1);
        m.set(1, 2, 1);
        assert_eq!(m.inhibitory(), 1);
        assert_eq!(m.activatory(), 1);
        assert_eq!(m.non_regulated(), 1); // gene 0 has no regulator
    }

    #[test]
    fn diamond_is_counted_exactly_once() {
        let m = diamond();
        // Only the (Y, W) orientation passes; (W, Y) has no outgoing X.
        assert_eq!(m.count_motifs(), 1);
    }

    #[test]
    fn extra_z_connection_disqualifies_the_motif() {
        let mut m = diamond();
        m.set(2, 3, 1); // X -> Z breaks the "Z unconnected to X" condition
        assert_eq!(m.count_motifs(), 0);
    }

    #[test]
    fn common_neighbours_counts_shared_partners() {
        let m = diamond();
        let cn = m.common_neighbours();
        let n = m.n();
        // Genes 1 (W) and 2 (X) both interact with 0, and with each other;
        // their only common neighbour is 0.
        assert_eq!(cn[1 * n + 2], 1);
        // Genes 2 and 3 share neighbour 0 only.
        assert_eq!(cn[2 * n + 3], 1);
        let pairs = m.neighbour_interaction_pairs();
        assert_eq!(pairs.len(), 6);
    }

    #[test]
    fn neighbour_rule_curve_is_a_probability() {
        let mut rng = Rng::new(8);
        let m = AdjMatrix::random(20, 0.15, 0.2, &mut rng);
        let (xs, ys) = m.neighbour_rule_curve();
        assert_eq!(xs.len(), ys.len());
        assert!(ys.iter().all(|&p| (0.0..=1.0).contains(&p)));
        // Common-neighbour counts come out sorted and distinct.
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn shuffling_preserves_the_edge_multiset() {
        let mut rng = Rng::new(5);
        let m = AdjMatrix::random(12, 0.2, 0.3, &mut rng);
        let s = m.shuffled(&mut rng);
        assert_eq!(m.activatory(), s.activatory());
        assert_eq!(m.inhibitory(), s.inhibitory());
        assert_eq!(m.n(), s.n());
    }

    #[test]
    fn enrichment_scores_are_well_formed() {
        let mut rng = Rng::new(11);
        let m = AdjMatrix::random(10, 0.25, 0.2, &mut rng);
        let e = motif_enrichment(&m, 50, &mut rng);
        assert_eq!(e.null_counts.len(), 50);
        assert_eq!(e.observed, m.count_motifs());
        assert!(e.p_value >= 0.0 && e.p_value <= 1.0);
        assert!(e.null_std >= 0.0);
    }
}
