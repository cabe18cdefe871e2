//! Three-compartment fractions that always sum to one.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compartment {
    Susceptible,
    Infected,
    Recovered,
}

impl Compartment {
    pub const ALL: [Compartment; 3] = [
        Compartment::Susceptible,
        Compartment::Infected,
        Compartment::Recovered,
    ];

    fn index(self) -> usize {
        match self {
            Compartment::Susceptible => 0,
            Compartment::Infected => 1,
            Compartment::Recovered => 2,
        }
    }

    fn others(self) -> [Compartment; 2] {
        match self {
            Compartment::Susceptible => [Compartment::Infected, Compartment::Recovered],
            Compartment::Infected => [Compartment::Susceptible, Compartment::Recovered],
            Compartment::Recovered => [Compartment::Susceptible, Compartment::Infected],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compartments {
    values: [f64; 3],
}

impl Default for Compartments {
    fn default() -> Self {
        Self {
            values: [1.0, 0.0, 0.0],
        }
    }
}

impl Compartments {
    /// Valid starting point from arbitrary control values.
    pub fn normalized(susceptible: f64, infected: f64, recovered: f64) -> Self {
        let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        let values = [clean(susceptible), clean(infected), clean(recovered)];
        let sum: f64 = values.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Self::default();
        }
        let mut out = Self {
            values: values.map(|v| v / sum),
        };
        out.spread_residual();
        out
    }

    pub fn get(&self, c: Compartment) -> f64 {
        self.values[c.index()]
    }

    pub fn susceptible(&self) -> f64 {
        self.get(Compartment::Susceptible)
    }

    pub fn infected(&self) -> f64 {
        self.get(Compartment::Infected)
    }

    pub fn recovered(&self) -> f64 {
        self.get(Compartment::Recovered)
    }

    pub fn as_array(&self) -> [f64; 3] {
        self.values
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Set one fraction and move the others so the total stays at one.
    ///
    /// The edited value is clamped into `[0, 1]` (NaN keeps the current value).
    /// Its deviation is split equally over the other two; a compartment that would
    /// go negative stops at zero and its shortfall comes from the remaining one.
    pub fn rebalance(&mut self, edited: Compartment, value: f64) {
        let old = self.get(edited);
        let target = if value.is_nan() {
            old
        } else {
            value.clamp(0.0, 1.0)
        };
        let half = (target - old) / 2.0;

        let [a, b] = edited.others();
        let mut va = self.get(a) - half;
        let mut vb = self.get(b) - half;
        if va < 0.0 {
            vb += va;
            va = 0.0;
        }
        if vb < 0.0 {
            va += vb;
            vb = 0.0;
        }

        self.values[edited.index()] = target;
        self.values[a.index()] = va.max(0.0);
        self.values[b.index()] = vb.max(0.0);
        self.spread_residual();
    }

    fn spread_residual(&mut self) {
        let residual = 1.0 - self.sum();
        if residual == 0.0 {
            return;
        }
        for v in &mut self.values {
            *v += residual / 3.0;
        }

        // A compartment sitting at zero can round just below it; the largest
        // one absorbs the difference.
        let deficit: f64 = self.values.iter().filter(|v| **v < 0.0).sum();
        if deficit < 0.0 {
            for v in &mut self.values {
                *v = v.max(0.0);
            }
            let largest = (0..3)
                .max_by(|&a, &b| self.values[a].total_cmp(&self.values[b]))
                .unwrap_or(0);
            self.values[largest] += deficit;
        }
    }
}
