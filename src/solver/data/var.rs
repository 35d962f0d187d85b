#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Var(u32);

impl Var {
    pub fn new(i: i32) -> Self {
        assert!(i > 0, "Variables are numbered starting at 1");
        Var(i as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Debug for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::fmt::Display for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// Literals are represented as u32.
// The LSB is one, iff the literal is negative.
// The remaining bits represent the variable.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit(u32);

impl Lit {
    pub fn new(lit: i32) -> Self {
        assert_ne!(lit, 0, "Literals cant be zero");

        let magnitude = lit.unsigned_abs();
        assert!(magnitude <= u32::MAX >> 1, "Lit magnitude too large.");

        Lit((magnitude << 1) | ((lit < 0) as u32))
    }

    pub fn var(self) -> Var {
        Var(self.0 >> 1)
    }

    /// Dense index of the literal: `2 * (var - 1)` for the positive
    /// polarity, one more for the negative. Both polarities of a variable
    /// sit next to each other.
    pub fn code(self) -> usize {
        // There is no 0 or -0 literal, so the smallest raw value is 2.
        (self.0 - 2) as usize
    }

    pub fn is_pos(self) -> bool {
        self.0 & 1 == 0
    }

    #[allow(unused)]
    pub fn is_neg(self) -> bool {
        self.0 & 1 == 1
    }

    /// The literal as the signed integer it was built from.
    pub fn as_int(self) -> i32 {
        let var = (self.0 >> 1) as i32;
        if self.is_pos() {
            var
        } else {
            -var
        }
    }
}

impl From<Var> for Lit {
    fn from(v: Var) -> Self {
        Lit(v.0 << 1)
    }
}

impl std::ops::Neg for Lit {
    type Output = Lit;

    fn neg(self) -> Self::Output {
        Lit(self.0 ^ 1)
    }
}

impl std::fmt::Debug for Lit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Lit").field(&self.as_int()).finish()
    }
}

impl std::fmt::Display for Lit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_int().fmt(f)
    }
}
