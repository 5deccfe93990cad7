use rand::Rng;
use std::f64::consts::PI;

/// Row-major dense matrix. Row `i` holds everything feeding output unit `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // Uniform on (0, 1] so ln() never sees 0.
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// He initialization: samples from N(0, sqrt(2 / cols)).
    ///
    /// `cols` is the fan-in. The generator is passed in so that a seeded
    /// network produces the same weights on every run.
    pub fn he<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let std_dev = (2.0 / cols as f64).sqrt();
        let mut res = Matrix::zeros(rows, cols);
        for row in res.data.iter_mut() {
            for w in row.iter_mut() {
                *w = Matrix::sample_standard_normal(rng) * std_dev;
            }
        }
        res
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data.first().map_or(0, |row| row.len()),
            data
        }
    }

    /// `self · v`, length `rows`.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(self.cols, v.len(), "Matrix and vector are of incorrect sizes");
        self.data.iter()
            .map(|row| row.iter().zip(v).map(|(w, x)| w * x).sum())
            .collect()
    }

    /// `selfᵀ · v`, length `cols`.
    pub fn transpose_mul_vec(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(self.rows, v.len(), "Matrix and vector are of incorrect sizes");
        let mut res = vec![0.0; self.cols];
        for (row, &g) in self.data.iter().zip(v) {
            for (acc, w) in res.iter_mut().zip(row) {
                *acc += g * w;
            }
        }
        res
    }

    /// `self[i][j] += scale · a[i] · b[j]`
    pub fn add_outer(&mut self, a: &[f64], b: &[f64], scale: f64) {
        assert_eq!(self.rows, a.len(), "Outer product rows are of incorrect size");
        assert_eq!(self.cols, b.len(), "Outer product cols are of incorrect size");
        for (row, &ai) in self.data.iter_mut().zip(a) {
            for (x, &bj) in row.iter_mut().zip(b) {
                *x += scale * ai * bj;
            }
        }
    }

    /// `self -= scale · rhs`, element-wise.
    pub fn sub_scaled(&mut self, rhs: &Matrix, scale: f64) {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }
        for (row, rhs_row) in self.data.iter_mut().zip(&rhs.data) {
            for (x, r) in row.iter_mut().zip(rhs_row) {
                *x -= scale * r;
            }
        }
    }

    pub fn scale(&mut self, factor: f64) {
        for row in self.data.iter_mut() {
            for x in row.iter_mut() {
                *x *= factor;
            }
        }
    }
}
