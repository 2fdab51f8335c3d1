//! Raw (untyped) netlist representation produced by the parser.

/// All component lines of a netlist, in file order.
#[derive(Debug, Clone, Default)]
pub struct NetlistAst {
    pub components: Vec<ComponentDef>,
}

impl NetlistAst {
    /// Create a new empty netlist AST.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A component line: its kind, identifier, and the remaining fields as text.
#[derive(Debug, Clone)]
pub struct ComponentDef {
    pub component_type: ComponentType,
    /// Identifier token, including the kind prefix (e.g. `R1`)
    pub name: String,
    /// Fields after the identifier, one per entry of
    /// [`ComponentType::field_names`]
    pub fields: Vec<String>,
    /// Source line number for error reporting
    pub line: usize,
}

/// Component kinds supported by the netlist grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    Resistor,
    Inductor,
    Capacitor,
    VoltageSource,
    CurrentSource,
    /// Voltage-controlled current source (G)
    Vccs,
    /// Voltage-controlled voltage source (E)
    Vcvs,
    /// Current-controlled current source (F)
    Cccs,
    /// Current-controlled voltage source (H)
    Ccvs,
}

impl ComponentType {
    /// Parse a component type from the first character of its identifier.
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix.to_ascii_uppercase() {
            'R' => Some(Self::Resistor),
            'L' => Some(Self::Inductor),
            'C' => Some(Self::Capacitor),
            'V' => Some(Self::VoltageSource),
            'I' => Some(Self::CurrentSource),
            'G' => Some(Self::Vccs),
            'E' => Some(Self::Vcvs),
            'F' => Some(Self::Cccs),
            'H' => Some(Self::Ccvs),
            _ => None,
        }
    }

    /// Names of the fields following the identifier, in order.
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            Self::Resistor | Self::Inductor | Self::Capacitor => &["n+", "n-", "value"],
            Self::VoltageSource | Self::CurrentSource => {
                &["n+", "n-", "magnitude", "phase_deg", "frequency"]
            }
            Self::Vccs | Self::Vcvs => &["n+", "n-", "nc+", "nc-", "gain"],
            Self::Cccs | Self::Ccvs => &["n+", "n-", "sensor_id", "gain"],
        }
    }

    /// Number of fields following the identifier.
    pub fn arity(&self) -> usize {
        self.field_names().len()
    }

    /// Human-readable kind name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Resistor => "Resistor",
            Self::Inductor => "Inductor",
            Self::Capacitor => "Capacitor",
            Self::VoltageSource => "Voltage Source",
            Self::CurrentSource => "Current Source",
            Self::Vccs => "VCCS",
            Self::Vcvs => "VCVS",
            Self::Cccs => "CCCS",
            Self::Ccvs => "CCVS",
        }
    }
}
