/// Union-find over the integers `0..n`, used by `FiniteAutomaton::remove_epsilon`
/// to group states into epsilon-closures.
pub struct DisjointSets {
    elements: Vec<ElementData>,
}

#[derive(Clone)]
struct ElementData {
    parent: usize,
    min: usize,
    rank: usize,
}

impl Default for ElementData {
    fn default() -> Self {
        ElementData {
            parent: 0,
            min: 0,
            rank: 0,
        }
    }
}

impl DisjointSets {
    /// Creates a new collection of `n` disjoint singleton sets.
    pub fn new(n: usize) -> Self {
        let mut sets = DisjointSets {
            elements: Vec::new(),
        };

        sets.elements.resize(n, ElementData::default());
        sets.clear();

        sets
    }

    /// Resets the data structure so that every element is once again disjoint.
    pub fn clear(&mut self) {
        for i in 0..self.elements.len() {
            self.make_set(i);
        }
    }

    fn make_set(&mut self, x: usize) {
        let e_x = &mut self.elements[x];
        e_x.rank = 0;
        e_x.parent = x;
        e_x.min = x;
    }

    /// Returns the id of the root element representing `x`'s set.
    pub fn find_set(&mut self, x: usize) -> usize {
        let p_old = self.elements[x].parent;
        if p_old != x {
            self.elements[x].parent = self.find_set(p_old);
        }

        self.elements[x].parent
    }

    /// Like `find_set`, but identifies the set by its smallest member.
    pub fn find_set_min(&mut self, x: usize) -> usize {
        let root = self.find_set(x);
        self.elements[root].min
    }

    /// Merges the sets containing `x` and `y`.
    pub fn union_sets(&mut self, x: usize, y: usize) {
        let mut x = self.find_set(x);
        let mut y = self.find_set(y);

        if x == y {
            return;
        }

        let e = &mut self.elements;

        if e[x].rank < e[y].rank {
            std::mem::swap(&mut x, &mut y);
        }

        e[y].parent = x;
        if e[x].rank == e[y].rank {
            e[x].rank += 1;
        }

        if e[y].min < e[x].min {
            e[x].min = e[y].min;
        }
    }
}
