//! Registered signatures of external device routines.

use std::fmt;

use serde::Serialize;
use warpc_core::Dtype;

/// One overload of an external routine.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ExternSignature {
    /// Library namespace the symbol lives in (`libdevice`).
    pub library: String,
    /// Name used at call sites (`pow`).
    pub name: String,
    /// Symbol name with `{name}` standing for the routine name (`__nv_{name}f`).
    pub symbol_template: String,
    pub args: Vec<Dtype>,
    pub ret: Dtype,
}

impl ExternSignature {
    pub fn new(
        library: impl Into<String>,
        name: impl Into<String>,
        symbol_template: impl Into<String>,
        args: impl Into<Vec<Dtype>>,
        ret: Dtype,
    ) -> Self {
        Self {
            library: library.into(),
            name: name.into(),
            symbol_template: symbol_template.into(),
            args: args.into(),
            ret,
        }
    }

    /// Concrete symbol name.
    pub fn symbol(&self) -> String {
        self.symbol_template.replace("{name}", &self.name)
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Sum of parameter widths; smaller means narrower.
    pub fn total_width(&self) -> u32 {
        self.args.iter().map(|d| d.bit_width()).sum()
    }

    pub fn accepts_exact(&self, args: &[Dtype]) -> bool {
        self.args == args
    }

    /// Accepts `args` after float widening.
    ///
    /// Integers never convert. A float argument widens only into a strictly
    /// wider float parameter, so the two 16-bit formats never meet.
    pub fn accepts_widened(&self, args: &[Dtype]) -> bool {
        self.args.len() == args.len()
            && self
                .args
                .iter()
                .zip(args)
                .all(|(&param, &arg)| param == arg || widens_to(arg, param))
    }
}

fn widens_to(arg: Dtype, param: Dtype) -> bool {
    arg.is_float() && param.is_float() && arg.bit_width() < param.bit_width()
}

impl fmt::Display for ExternSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.library, self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ") -> {} [{}]", self.ret, self.symbol())
    }
}
