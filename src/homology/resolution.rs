use crate::cover::{cover_submodule_with_actions, CoverParams};
use crate::error::HomologyError;
use crate::homology::invariants::{counter_add, invariant_factors, AbelianGroup, DivisorCounter};
use crate::lattice::kernel::{default_kernel, relations_among, KernelFn};
use crate::lattice::Lattice;
use crate::math::{Action, ZVector};
use num_bigint::BigInt;
use num_traits::{One, Zero};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Index of a node in the resolution's arena. Children are stored as ids so
/// shared subgraphs (including a node reachable from itself a few dimensions
/// up) are plain references with a single owner.
pub type NodeId = usize;

/// One free Z[S]-module summand list at some dimension of the resolution,
/// with its boundary to the previous dimension.
#[derive(Debug)]
pub struct ResolutionNode {
    /// The idempotents [e1, ..., en]: this node is ZSe1 (+) ... (+) ZSen.
    pub module: Vec<usize>,
    /// Idempotents of the boundary target; None exactly at the root.
    pub prev_module: Option<Vec<usize>>,
    /// Image of each generator under the boundary, in the previous module's
    /// Z-basis.
    pub e_images: Vec<ZVector>,
    children: Option<Vec<NodeId>>,
    child_gen_indexes: Option<Vec<Vec<usize>>>,
}

impl ResolutionNode {
    pub fn children(&self) -> Option<&[NodeId]> {
        self.children.as_deref()
    }

    /// Which generators of this node each child's kernel component covers.
    pub fn child_gen_indexes(&self) -> Option<&[Vec<usize>]> {
        self.child_gen_indexes.as_deref()
    }
}

/// Size thresholds steering how much work a single extension step spends.
/// A threshold of -1 disables the behavior it guards.
#[derive(Clone, Debug)]
pub struct ExtendParams {
    pub max_size_for_extra_greedy: i64,
    pub max_size_to_ensure_minimal: i64,
    pub max_size_to_cache: i64,
    pub sloppy_last_cover: bool,
    pub verbose: bool,
}

impl Default for ExtendParams {
    fn default() -> Self {
        ExtendParams {
            max_size_for_extra_greedy: 200,
            max_size_to_ensure_minimal: 1000,
            max_size_to_cache: 1000,
            sloppy_last_cover: false,
            verbose: false,
        }
    }
}

fn threshold_allows(threshold: i64, size: usize) -> bool {
    threshold >= 0 && size as i64 <= threshold
}

/// Construction options for a resolution.
pub struct ResolutionOptions {
    /// The left S-set acted on by the augmentation target; defaults to the
    /// one-point set.
    pub left_action: Option<Vec<Vec<usize>>>,
    /// Validate associativity and action compatibility up front.
    pub check: bool,
    /// Kernel oracle; defaults to the stock lattice kernel.
    pub kernel: Option<KernelFn>,
}

impl Default for ResolutionOptions {
    fn default() -> Self {
        ResolutionOptions {
            left_action: None,
            check: true,
            kernel: None,
        }
    }
}

/// Options for homology extraction.
pub struct HomologyParams {
    /// The right S-set to tensor with; defaults to the one-point set.
    pub right_action: Option<Vec<Vec<usize>>>,
    pub check: bool,
    pub extend: ExtendParams,
}

impl Default for HomologyParams {
    fn default() -> Self {
        HomologyParams {
            right_action: None,
            check: true,
            extend: ExtendParams::default(),
        }
    }
}

type NodeKey = (Vec<usize>, Vec<usize>, Vec<ZVector>);

/// Per-homology-run state: the right action, the Xe orbits, and the three
/// memo tables keyed by node (and shift).
struct HomologyMemo {
    right_rows: Vec<Vec<usize>>,
    xe: Vec<Vec<usize>>,
    outgoing: HashMap<NodeId, Vec<BigInt>>,
    homology: HashMap<NodeId, DivisorCounter>,
    shifted: HashMap<(NodeId, usize), DivisorCounter>,
}

/// A projective resolution of the trivial module over Z[S], built lazily as
/// a DAG of nodes. Equal subtrees collapse through the node cache, which is
/// what keeps the exponential-rank cases tractable.
pub struct ProjectiveResolution {
    op: Vec<Vec<usize>>,
    identity: usize,
    left_action: Vec<Action>,
    y_count: usize,
    /// Idempotents in ascending |Se| order.
    idempotents: Vec<usize>,
    /// Per element e: the sorted left ideal Se (empty unless e is
    /// idempotent).
    se: Vec<Vec<usize>>,
    se_len: Vec<usize>,
    nodes: Vec<ResolutionNode>,
    node_cache: HashMap<NodeKey, NodeId>,
    root: NodeId,
    kernel: KernelFn,
}

/// Validate that the table is square with in-range entries.
pub fn validate_table(op: &[Vec<usize>]) -> Result<(), HomologyError> {
    let order = op.len();
    if order == 0 {
        return Err(HomologyError::EmptyTable);
    }
    for (row, entries) in op.iter().enumerate() {
        if entries.len() != order {
            return Err(HomologyError::TableNotSquare {
                row,
                len: entries.len(),
                expected: order,
            });
        }
        for (j, &value) in entries.iter().enumerate() {
            if value >= order {
                return Err(HomologyError::TableEntryOutOfRange {
                    i: row,
                    j,
                    value,
                    order,
                });
            }
        }
    }
    Ok(())
}

impl ProjectiveResolution {
    pub fn new(op: &[Vec<usize>]) -> Result<Self, HomologyError> {
        Self::with_options(op, ResolutionOptions::default())
    }

    pub fn with_options(
        op: &[Vec<usize>],
        options: ResolutionOptions,
    ) -> Result<Self, HomologyError> {
        validate_table(op)?;
        let order = op.len();
        let left_rows: Vec<Vec<usize>> = options
            .left_action
            .unwrap_or_else(|| vec![vec![0]; order]);
        if left_rows.len() != order {
            return Err(HomologyError::ActionRowCountMismatch {
                side: "left",
                rows: left_rows.len(),
                expected: order,
            });
        }
        let y_count = left_rows.first().map(|row| row.len()).unwrap_or(0);
        for (row, entries) in left_rows.iter().enumerate() {
            if entries.len() != y_count {
                return Err(HomologyError::ActionRowLengthMismatch {
                    side: "left",
                    row,
                    len: entries.len(),
                    expected: y_count,
                });
            }
            for (col, &value) in entries.iter().enumerate() {
                if value >= y_count {
                    return Err(HomologyError::ActionEntryOutOfRange {
                        side: "left",
                        row,
                        col,
                        value,
                        states: y_count,
                    });
                }
            }
        }

        let all_idempotents: Vec<usize> = (0..order).filter(|&e| op[e][e] == e).collect();
        let identity = all_idempotents
            .iter()
            .copied()
            .find(|&e| (0..order).all(|x| op[x][e] == x && op[e][x] == x))
            .ok_or(HomologyError::NoIdentity)?;

        if options.check {
            for i in 0..order {
                for j in 0..order {
                    let ij = op[i][j];
                    for k in 0..order {
                        let left = op[ij][k];
                        let right = op[i][op[j][k]];
                        if left != right {
                            return Err(HomologyError::NotAssociative {
                                i,
                                j,
                                k,
                                left,
                                right,
                            });
                        }
                    }
                    for y in 0..y_count {
                        let left = left_rows[ij][y];
                        let right = left_rows[i][left_rows[j][y]];
                        if left != right {
                            return Err(HomologyError::LeftActionIncompatible {
                                i,
                                j,
                                y,
                                left,
                                right,
                            });
                        }
                    }
                }
            }
            for (y, &target) in left_rows[identity].iter().enumerate() {
                if target != y {
                    return Err(HomologyError::ActionIdentityNotFixed { identity, y });
                }
            }
        }

        let mut se: Vec<Vec<usize>> = vec![Vec::new(); order];
        for &e in &all_idempotents {
            let mut ideal: Vec<usize> = (0..order).map(|x| op[x][e]).collect();
            ideal.sort_unstable();
            ideal.dedup();
            se[e] = ideal;
        }
        let mut idempotents = all_idempotents;
        idempotents.sort_by_key(|&e| se[e].len());
        let se_len: Vec<usize> = se.iter().map(|ideal| ideal.len()).collect();

        let kernel = options
            .kernel
            .unwrap_or_else(|| Rc::new(default_kernel) as KernelFn);

        let mut resolution = ProjectiveResolution {
            op: op.to_vec(),
            identity,
            left_action: left_rows.into_iter().map(Action::new).collect(),
            y_count,
            idempotents,
            se,
            se_len,
            nodes: Vec::new(),
            node_cache: HashMap::new(),
            root: 0,
            kernel,
        };

        // The root covers the whole augmentation module Z^Y.
        let full = Lattice::full(y_count);
        let (e_images, module) = cover_submodule_with_actions(
            y_count,
            full.get_basis(),
            &resolution.left_action,
            &resolution.idempotents,
            &resolution.se_len,
            &CoverParams {
                extra_greedy: false,
                ensure_minimal: true,
                verbose: false,
            },
        )?;
        resolution.root = resolution.push_node(ResolutionNode {
            module,
            prev_module: None,
            e_images,
            children: None,
            child_gen_indexes: None,
        });
        Ok(resolution)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn identity(&self) -> usize {
        self.identity
    }

    pub fn node(&self, id: NodeId) -> &ResolutionNode {
        &self.nodes[id]
    }

    fn push_node(&mut self, node: ResolutionNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Total Z-rank of a summand list.
    fn z_rank(&self, module: &[usize]) -> usize {
        module.iter().map(|&e| self.se_len[e]).sum()
    }

    /// One action per element of S over the concatenated Z-basis of the
    /// module: the basis element for se in the summand of e, at offset o,
    /// goes to o + index-of(op[s][se] in Se).
    pub fn make_actions(&self, module: &[usize]) -> Vec<Action> {
        let total = self.z_rank(module);
        let mut tables: Vec<Vec<usize>> = vec![vec![0; total]; self.op.len()];
        let mut offset = 0;
        for &e in module {
            let ideal = &self.se[e];
            for (s, table) in tables.iter_mut().enumerate() {
                for (ii, &x) in ideal.iter().enumerate() {
                    let product = self.op[s][x];
                    let jj = ideal
                        .binary_search(&product)
                        .expect("left ideal not closed under multiplication");
                    table[offset + ii] = offset + jj;
                }
            }
            offset += ideal.len();
        }
        tables.into_iter().map(Action::new).collect()
    }

    /// The boundary matrix of a node as columns over the previous module's
    /// Z-basis.
    fn boundary_columns(&self, id: NodeId) -> Vec<ZVector> {
        let node = &self.nodes[id];
        let (actions, prev_rank) = match &node.prev_module {
            None => (self.left_action.clone(), self.y_count),
            Some(prev) => (self.make_actions(prev), self.z_rank(prev)),
        };
        let mut columns = Vec::new();
        for (image, &e) in node.e_images.iter().zip(&node.module) {
            for &s_elt in &self.se[e] {
                columns.push(image.shuffled_by_action(&actions[s_elt], prev_rank));
            }
        }
        columns
    }

    /// Materialize (or fetch) the children covering this node's boundary
    /// kernel, split by summand where the kernel decomposes.
    pub fn get_children(
        &mut self,
        id: NodeId,
        params: &ExtendParams,
    ) -> Result<Vec<NodeId>, HomologyError> {
        if let Some(children) = &self.nodes[id].children {
            return Ok(children.clone());
        }
        let module = self.nodes[id].module.clone();
        let columns = self.boundary_columns(id);
        let kernel_basis = (self.kernel.as_ref())(&columns, params.verbose)?;

        let mut index_to_gen: Vec<usize> = Vec::new();
        let mut gen_ranges: Vec<Vec<usize>> = Vec::new();
        for (i, &e) in module.iter().enumerate() {
            let start = index_to_gen.len();
            index_to_gen.extend(std::iter::repeat(i).take(self.se_len[e]));
            gen_ranges.push((start..index_to_gen.len()).collect());
        }

        let kernel_lattice = Lattice::from_vectors(columns.len(), &kernel_basis);
        let components = kernel_lattice.decompose(&gen_ranges);
        if params.verbose {
            let sizes: Vec<usize> = components.iter().map(|(cols, _)| cols.len()).collect();
            eprintln!(
                "[resolution] split into {} bins: {:?}",
                components.len(),
                sizes
            );
        }

        let mut children = Vec::new();
        let mut child_gen_indexes = Vec::new();
        for (column_group, summand) in components {
            let mut gen_indexes: Vec<usize> =
                column_group.iter().map(|&ix| index_to_gen[ix]).collect();
            gen_indexes.dedup();
            let summand_gens: Vec<usize> = gen_indexes.iter().map(|&g| module[g]).collect();
            let sub_actions = self.make_actions(&summand_gens);
            let cover_params = CoverParams {
                extra_greedy: threshold_allows(params.max_size_for_extra_greedy, summand.rank()),
                ensure_minimal: threshold_allows(
                    params.max_size_to_ensure_minimal,
                    summand.rank(),
                ),
                verbose: params.verbose,
            };
            let (child_images, child_module) = cover_submodule_with_actions(
                column_group.len(),
                summand.get_basis(),
                &sub_actions,
                &self.idempotents,
                &self.se_len,
                &cover_params,
            )?;
            let image_size: usize = child_images.iter().map(ZVector::len).sum();
            let child = if threshold_allows(params.max_size_to_cache, image_size) {
                let key = (
                    child_module.clone(),
                    summand_gens.clone(),
                    child_images.clone(),
                );
                match self.node_cache.get(&key) {
                    Some(&cached) => {
                        if params.verbose {
                            eprintln!(
                                "[resolution] cache hit on {}gens <-- {}gens",
                                summand_gens.len(),
                                child_module.len()
                            );
                        }
                        cached
                    }
                    None => {
                        let fresh = self.push_node(ResolutionNode {
                            module: child_module,
                            prev_module: Some(summand_gens),
                            e_images: child_images,
                            children: None,
                            child_gen_indexes: None,
                        });
                        self.node_cache.insert(key, fresh);
                        fresh
                    }
                }
            } else {
                self.push_node(ResolutionNode {
                    module: child_module,
                    prev_module: Some(summand_gens),
                    e_images: child_images,
                    children: None,
                    child_gen_indexes: None,
                })
            };
            children.push(child);
            child_gen_indexes.push(gen_indexes);
        }
        self.nodes[id].children = Some(children.clone());
        self.nodes[id].child_gen_indexes = Some(child_gen_indexes);
        Ok(children)
    }

    /// Materialize the resolution level by level down to `dim`. With
    /// `sloppy_last_cover`, the frontier level skips the minimality pass.
    pub fn extend_to_dimension(
        &mut self,
        dim: usize,
        params: &ExtendParams,
    ) -> Result<(), HomologyError> {
        let mut frontier: Vec<NodeId> = vec![self.root];
        for level in 0..dim {
            let mut level_params = params.clone();
            if params.sloppy_last_cover && level + 1 == dim {
                level_params.max_size_to_ensure_minimal = -1;
            }
            let mut next: Vec<NodeId> = Vec::new();
            let mut seen: HashSet<NodeId> = HashSet::new();
            for node in frontier {
                for child in self.get_children(node, &level_params)? {
                    if seen.insert(child) {
                        next.push(child);
                    }
                }
            }
            frontier = next;
            if frontier.is_empty() {
                break;
            }
        }
        Ok(())
    }

    /// Sum of Z-ranks of the distinct nodes at each materialized level
    /// through `dim`. The strategy driver compares this against its
    /// try-harder threshold.
    pub fn total_cost(&self, dim: usize) -> usize {
        let mut total = 0;
        let mut level: Vec<NodeId> = vec![self.root];
        for depth in 0..=dim {
            for &id in &level {
                total += self.z_rank(&self.nodes[id].module);
            }
            if depth == dim {
                break;
            }
            let mut next: Vec<NodeId> = Vec::new();
            let mut seen: HashSet<NodeId> = HashSet::new();
            for &id in &level {
                if let Some(children) = &self.nodes[id].children {
                    for &child in children {
                        if seen.insert(child) {
                            next.push(child);
                        }
                    }
                }
            }
            level = next;
            if level.is_empty() {
                break;
            }
        }
        total
    }

    /// The homology groups H_0, ..., H_maxdim after tensoring with the
    /// given right S-set.
    pub fn homology_list(
        &mut self,
        maxdim: usize,
        params: &HomologyParams,
    ) -> Result<Vec<AbelianGroup>, HomologyError> {
        let order = self.op.len();
        let right_rows: Vec<Vec<usize>> = params
            .right_action
            .clone()
            .unwrap_or_else(|| vec![vec![0; order]]);
        let x_count = right_rows.len();
        if params.check {
            for (row, entries) in right_rows.iter().enumerate() {
                if entries.len() != order {
                    return Err(HomologyError::ActionRowLengthMismatch {
                        side: "right",
                        row,
                        len: entries.len(),
                        expected: order,
                    });
                }
                for (col, &value) in entries.iter().enumerate() {
                    if value >= x_count {
                        return Err(HomologyError::ActionEntryOutOfRange {
                            side: "right",
                            row,
                            col,
                            value,
                            states: x_count,
                        });
                    }
                }
            }
            for x in 0..x_count {
                for i in 0..order {
                    let xi = right_rows[x][i];
                    for j in 0..order {
                        let left = right_rows[xi][j];
                        let right = right_rows[x][self.op[i][j]];
                        if left != right {
                            return Err(HomologyError::RightActionIncompatible {
                                x,
                                i,
                                j,
                                left,
                                right,
                            });
                        }
                    }
                }
            }
        }

        // Per idempotent: the sorted orbit Xe.
        let mut xe: Vec<Vec<usize>> = vec![Vec::new(); order];
        for &e in &self.idempotents {
            let mut orbit: Vec<usize> = right_rows.iter().map(|row| row[e]).collect();
            orbit.sort_unstable();
            orbit.dedup();
            xe[e] = orbit;
        }

        let mut memo = HomologyMemo {
            right_rows,
            xe,
            outgoing: HashMap::new(),
            homology: HashMap::new(),
            shifted: HashMap::new(),
        };
        let mut result = Vec::with_capacity(maxdim + 1);
        for dim in 0..=maxdim {
            let counts = self.homology_with_shift(self.root, dim, &mut memo, &params.extend)?;
            result.push(invariant_factors(&counts));
        }
        Ok(result)
    }

    /// Homology of this node's subtree as if shifted `shift` levels down:
    /// at shift 0 it is the homology at the node itself, otherwise the sum
    /// over children at shift - 1. Memoized per (node, shift), so shared
    /// subgraphs contribute once per distinct node and recombine additively.
    fn homology_with_shift(
        &mut self,
        id: NodeId,
        shift: usize,
        memo: &mut HomologyMemo,
        extend: &ExtendParams,
    ) -> Result<DivisorCounter, HomologyError> {
        if let Some(counts) = memo.shifted.get(&(id, shift)) {
            return Ok(counts.clone());
        }
        let counts = if shift == 0 {
            self.homology_at(id, memo, extend)?
        } else {
            let mut accumulated = DivisorCounter::new();
            for child in self.get_children(id, extend)? {
                let child_counts = self.homology_with_shift(child, shift - 1, memo, extend)?;
                for (divisor, count) in child_counts {
                    counter_add(&mut accumulated, divisor, count);
                }
            }
            accumulated
        };
        memo.shifted.insert((id, shift), counts.clone());
        Ok(counts)
    }

    fn homology_at(
        &mut self,
        id: NodeId,
        memo: &mut HomologyMemo,
        extend: &ExtendParams,
    ) -> Result<DivisorCounter, HomologyError> {
        if let Some(counts) = memo.homology.get(&id) {
            return Ok(counts.clone());
        }
        let children = self.get_children(id, extend)?;
        let mut incoming = DivisorCounter::new();
        for &child in &children {
            for divisor in self.outgoing_tensored_invariants(child, memo) {
                counter_add(&mut incoming, divisor, BigInt::one());
            }
        }
        let chains_rank: usize = self.nodes[id]
            .module
            .iter()
            .map(|&e| memo.xe[e].len())
            .sum();
        let outgoing_rank = self.outgoing_tensored_invariants(id, memo).len();
        let incoming_rank: BigInt = incoming.values().sum();
        let free_rank = BigInt::from(chains_rank) - BigInt::from(outgoing_rank) - incoming_rank;
        assert!(
            free_rank >= BigInt::zero(),
            "rank accounting mismatch at a resolution node"
        );
        let one = BigInt::one();
        let mut counts: DivisorCounter = incoming
            .into_iter()
            .filter(|(divisor, _)| divisor > &one)
            .collect();
        if !free_rank.is_zero() {
            counts.insert(BigInt::zero(), free_rank);
        }
        memo.homology.insert(id, counts.clone());
        Ok(counts)
    }

    /// Invariants of the tensored boundary image: each summand ZSe of the
    /// previous module collapses to ZXe, and the generator images are pushed
    /// through one action per element of X. The root has no outgoing map and
    /// returns the empty list.
    fn outgoing_tensored_invariants(&self, id: NodeId, memo: &mut HomologyMemo) -> Vec<BigInt> {
        if let Some(invariants) = memo.outgoing.get(&id) {
            return invariants.clone();
        }
        let node = &self.nodes[id];
        let invariants = match &node.prev_module {
            None => Vec::new(),
            Some(prev) => {
                let n0 = self.z_rank(prev);
                let n1: usize = prev.iter().map(|&e| memo.xe[e].len()).sum();
                let x_count = memo.right_rows.len();
                let mut tables: Vec<Vec<usize>> = vec![vec![0; n0]; x_count];
                let mut offset0 = 0;
                let mut offset1 = 0;
                for &e in prev {
                    let ideal = &self.se[e];
                    let orbit = &memo.xe[e];
                    for (x, table) in tables.iter_mut().enumerate() {
                        for (ii, &s_elt) in ideal.iter().enumerate() {
                            let target = memo.right_rows[x][s_elt];
                            let jj = orbit
                                .binary_search(&target)
                                .expect("right orbit not closed under the action");
                            table[offset0 + ii] = offset1 + jj;
                        }
                    }
                    offset0 += ideal.len();
                    offset1 += orbit.len();
                }
                let actions: Vec<Action> = tables.into_iter().map(Action::new).collect();
                let mut image = Lattice::with_maxrank(n1, x_count * node.module.len());
                for e_image in &node.e_images {
                    for action in &actions {
                        image.add_vector(&e_image.shuffled_by_action(action, n1));
                    }
                }
                image.nonzero_invariants()
            }
        };
        memo.outgoing.insert(id, invariants.clone());
        invariants
    }

    /// Audit exactness of everything materialized so far: the root surjects
    /// onto the augmentation module, every child's embedded boundary columns
    /// lie in the parent's boundary kernel, and together they span it.
    /// Violations are programmer errors and panic.
    pub fn assert_exact(&self) {
        let mut stack = vec![self.root];
        let mut seen: HashSet<NodeId> = HashSet::from([self.root]);
        while let Some(id) = stack.pop() {
            self.check_exactness_at(id);
            if let Some(children) = &self.nodes[id].children {
                for &child in children {
                    if seen.insert(child) {
                        stack.push(child);
                    }
                }
            }
        }
    }

    fn check_exactness_at(&self, id: NodeId) {
        let node = &self.nodes[id];
        let columns = self.boundary_columns(id);
        if node.prev_module.is_none() {
            let mut image = Lattice::new(self.y_count);
            for column in &columns {
                image.add_vector(column);
            }
            assert_eq!(
                image.rank(),
                self.y_count,
                "root must surject onto the augmentation module"
            );
            assert!(
                image.nonzero_invariants().iter().all(|d| d.is_one()),
                "root image is not all of the augmentation module"
            );
        }
        let (Some(children), Some(groups)) = (&node.children, &node.child_gen_indexes) else {
            return;
        };
        let kernel = relations_among(&columns);
        let width = columns.len();
        // Column offsets of each generator's block.
        let mut offsets = Vec::with_capacity(node.module.len());
        let mut running = 0;
        for &e in &node.module {
            offsets.push(running);
            running += self.se_len[e];
        }
        let mut spanned = Lattice::new(width);
        for (&child_id, gen_indexes) in children.iter().zip(groups) {
            let embed: Vec<usize> = gen_indexes
                .iter()
                .flat_map(|&g| {
                    let e = node.module[g];
                    offsets[g]..offsets[g] + self.se_len[e]
                })
                .collect();
            for column in self.boundary_columns(child_id) {
                let mut embedded = ZVector::zero(width);
                for (position, &target) in embed.iter().enumerate() {
                    embedded.set(target, column.get(position).clone());
                }
                assert!(
                    kernel.contains(&embedded),
                    "child boundary image escapes the kernel"
                );
                spanned.add_vector(&embedded);
            }
        }
        assert_eq!(
            spanned.rank(),
            kernel.rank(),
            "children do not span the boundary kernel"
        );
        for row in kernel.get_basis() {
            assert!(
                spanned.contains(row),
                "kernel vector not covered by the children"
            );
        }
    }
}
