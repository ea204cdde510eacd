//! SMILES parsing into a molecular graph.
//!
//! The same parser reads registered structures and query patterns. Patterns
//! additionally accept the SMARTS any-bond `~`; both accept the `*` wildcard
//! atom. Stereo markers (`@`, `/`, `\`) are consumed and ignored, and no
//! canonicalization or aromaticity perception is performed: `c1ccccc1` and
//! `C1=CC=CC=C1` are different graphs.

use std::collections::BTreeMap;
use std::fmt;

/// Element symbols indexed by atomic number (index 0 is the `*` wildcard).
const ELEMENTS: [&str; 87] = [
    "*", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
    "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge",
    "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd",
    "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn",
];

/// Elements that may be written lowercase (aromatic) inside brackets.
const AROMATIC_BRACKET: [&str; 8] = ["b", "c", "n", "o", "p", "s", "se", "as"];

/// Atomic number for an element symbol, case-sensitive.
pub fn atomic_number(symbol: &str) -> Option<u8> {
    ELEMENTS
        .iter()
        .position(|&s| s == symbol)
        .and_then(|n| u8::try_from(n).ok())
}

/// Element symbol for an atomic number.
pub fn element_symbol(atomic_number: u8) -> Option<&'static str> {
    ELEMENTS.get(atomic_number as usize).copied()
}

/// Bond classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondKind {
    Single,
    Double,
    Triple,
    Aromatic,
    /// `~` in a pattern: matches every bond.
    Any,
}

/// A graph node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    /// 0 for the `*` wildcard.
    pub atomic_number: u8,
    pub aromatic: bool,
    pub charge: i8,
    /// Whether the atom was written in brackets (charge is then authoritative).
    pub bracket: bool,
}

impl Atom {
    pub fn is_wildcard(&self) -> bool {
        self.atomic_number == 0
    }
}

/// A graph edge between two atom indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bond {
    pub begin: usize,
    pub end: usize,
    pub kind: BondKind,
    /// False when the bond symbol was omitted in the input.
    pub explicit: bool,
}

/// Molecular graph with an adjacency list of `(neighbor, bond index)` pairs.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    pub adjacency: Vec<Vec<(usize, usize)>>,
}

impl Molecule {
    fn from_parts(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (index, bond) in bonds.iter().enumerate() {
            adjacency[bond.begin].push((bond.end, index));
            adjacency[bond.end].push((bond.begin, index));
        }
        Self {
            atoms,
            bonds,
            adjacency,
        }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// The bond joining two atoms, if any.
    pub fn bond_between(&self, a: usize, b: usize) -> Option<&Bond> {
        self.adjacency[a]
            .iter()
            .find(|&&(neighbor, _)| neighbor == b)
            .map(|&(_, bond)| &self.bonds[bond])
    }
}

/// Parse failure with the byte offset it was detected at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmilesError {
    pub position: usize,
    pub message: String,
}

impl fmt::Display for SmilesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at position {}", self.message, self.position)
    }
}

impl std::error::Error for SmilesError {}

/// Parse a structure.
pub fn parse_structure(smiles: &str) -> Result<Molecule, SmilesError> {
    Parser::new(smiles, false).parse()
}

/// Parse a query pattern (SMILES plus the `~` any-bond).
pub fn parse_pattern(pattern: &str) -> Result<Molecule, SmilesError> {
    Parser::new(pattern, true).parse()
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    query: bool,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    /// Open ring bonds: number → (atom, bond written at the opening).
    rings: BTreeMap<u16, (usize, Option<BondKind>)>,
    branches: Vec<usize>,
    prev: Option<usize>,
    pending: Option<BondKind>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, query: bool) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            query,
            atoms: Vec::new(),
            bonds: Vec::new(),
            rings: BTreeMap::new(),
            branches: Vec::new(),
            prev: None,
            pending: None,
        }
    }

    fn error(&self, message: impl Into<String>) -> SmilesError {
        SmilesError {
            position: self.pos,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn parse(mut self) -> Result<Molecule, SmilesError> {
        if self.input.iter().all(u8::is_ascii_whitespace) {
            return Err(self.error("empty input"));
        }

        while let Some(ch) = self.peek() {
            match ch {
                b'(' => {
                    let prev = self
                        .prev
                        .ok_or_else(|| self.error("branch without preceding atom"))?;
                    self.bump();
                    self.branches.push(prev);
                }
                b')' => {
                    if self.pending.is_some() {
                        return Err(self.error("bond symbol before ')'"));
                    }
                    self.bump();
                    self.prev = Some(
                        self.branches
                            .pop()
                            .ok_or_else(|| self.error("unmatched ')'"))?,
                    );
                }
                b'-' | b'=' | b'#' | b':' | b'~' => {
                    if self.pending.is_some() {
                        return Err(self.error("consecutive bond symbols"));
                    }
                    if ch == b'~' && !self.query {
                        return Err(self.error("'~' is only valid in patterns"));
                    }
                    self.bump();
                    self.pending = Some(match ch {
                        b'-' => BondKind::Single,
                        b'=' => BondKind::Double,
                        b'#' => BondKind::Triple,
                        b':' => BondKind::Aromatic,
                        _ => BondKind::Any,
                    });
                }
                b'/' | b'\\' => {
                    self.bump();
                }
                b'.' => {
                    if self.pending.is_some() {
                        return Err(self.error("bond symbol before '.'"));
                    }
                    self.bump();
                    self.prev = None;
                }
                b'%' => {
                    self.bump();
                    let number = self.two_digit_ring()?;
                    self.ring_bond(number)?;
                }
                b'0'..=b'9' => {
                    self.bump();
                    self.ring_bond(u16::from(ch - b'0'))?;
                }
                b'[' => self.bracket_atom()?,
                _ => self.organic_atom()?,
            }
        }

        if self.pending.is_some() {
            return Err(self.error("dangling bond symbol"));
        }
        if !self.branches.is_empty() {
            return Err(self.error("unclosed branch"));
        }
        if let Some(number) = self.rings.keys().next() {
            return Err(self.error(format!("unclosed ring bond {}", number)));
        }
        if self.atoms.is_empty() {
            return Err(self.error("no atoms"));
        }

        Ok(Molecule::from_parts(self.atoms, self.bonds))
    }

    fn organic_atom(&mut self) -> Result<(), SmilesError> {
        let start = self.pos;
        let ch = self.bump().ok_or_else(|| self.error("unexpected end of input"))?;

        let (symbol, aromatic) = match ch {
            b'*' => ("*", false),
            b'B' if self.peek() == Some(b'r') => {
                self.bump();
                ("Br", false)
            }
            b'C' if self.peek() == Some(b'l') => {
                self.bump();
                ("Cl", false)
            }
            b'B' => ("B", false),
            b'C' => ("C", false),
            b'N' => ("N", false),
            b'O' => ("O", false),
            b'P' => ("P", false),
            b'S' => ("S", false),
            b'F' => ("F", false),
            b'I' => ("I", false),
            b'b' => ("B", true),
            b'c' => ("C", true),
            b'n' => ("N", true),
            b'o' => ("O", true),
            b'p' => ("P", true),
            b's' => ("S", true),
            _ => {
                self.pos = start;
                return Err(self.error(format!("unexpected character '{}'", ch as char)));
            }
        };

        let atomic_number = atomic_number(symbol)
            .ok_or_else(|| self.error(format!("unknown element '{}'", symbol)))?;
        self.push_atom(Atom {
            atomic_number,
            aromatic,
            charge: 0,
            bracket: false,
        });
        Ok(())
    }

    fn bracket_atom(&mut self) -> Result<(), SmilesError> {
        self.bump(); // '['

        // Isotope is accepted but not tracked.
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.bump();
        }

        let first = self
            .bump()
            .ok_or_else(|| self.error("unexpected end of bracket atom"))?;
        let (atomic_number, aromatic) = if first == b'*' {
            (0, false)
        } else if first.is_ascii_uppercase() {
            self.bracket_symbol(first, false)?
        } else if first.is_ascii_lowercase() {
            self.bracket_symbol(first, true)?
        } else {
            return Err(self.error(format!("invalid atom symbol '{}'", first as char)));
        };

        while self.peek() == Some(b'@') {
            self.bump();
        }

        if self.peek() == Some(b'H') {
            self.bump();
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.bump();
            }
        }

        let charge = self.bracket_charge()?;

        // Atom class, e.g. [CH3:1]
        if self.peek() == Some(b':') {
            self.bump();
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.bump();
            }
        }

        if self.bump() != Some(b']') {
            return Err(self.error("expected ']'"));
        }

        self.push_atom(Atom {
            atomic_number,
            aromatic,
            charge,
            bracket: true,
        });
        Ok(())
    }

    fn bracket_symbol(&mut self, first: u8, aromatic: bool) -> Result<(u8, bool), SmilesError> {
        // Prefer the two-letter reading when it names a known element.
        if let Some(second) = self.peek().filter(u8::is_ascii_lowercase) {
            let two = [first, second];
            let two = std::str::from_utf8(&two).unwrap_or_default();
            let resolved = if aromatic {
                AROMATIC_BRACKET
                    .contains(&two)
                    .then(|| capitalize(two))
                    .and_then(|s| atomic_number(&s))
            } else {
                atomic_number(two)
            };
            if let Some(number) = resolved {
                self.bump();
                return Ok((number, aromatic));
            }
        }

        let one = (first as char).to_string();
        let number = if aromatic {
            AROMATIC_BRACKET
                .contains(&one.as_str())
                .then(|| capitalize(&one))
                .and_then(|s| atomic_number(&s))
        } else {
            atomic_number(&one)
        };
        number
            .map(|n| (n, aromatic))
            .ok_or_else(|| self.error(format!("unknown element '{}'", one)))
    }

    fn bracket_charge(&mut self) -> Result<i8, SmilesError> {
        let sign: i8 = match self.peek() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Ok(0),
        };
        let symbol = self.bump().unwrap_or_default();

        if let Some(digit @ b'0'..=b'9') = self.peek() {
            self.bump();
            return Ok(sign * (digit - b'0') as i8);
        }

        let mut magnitude: i8 = 1;
        while self.peek() == Some(symbol) {
            self.bump();
            magnitude = magnitude
                .checked_add(1)
                .ok_or_else(|| self.error("charge out of range"))?;
        }
        Ok(sign * magnitude)
    }

    fn two_digit_ring(&mut self) -> Result<u16, SmilesError> {
        match (self.bump(), self.bump()) {
            (Some(d1 @ b'0'..=b'9'), Some(d2 @ b'0'..=b'9')) => {
                Ok(u16::from(d1 - b'0') * 10 + u16::from(d2 - b'0'))
            }
            _ => Err(self.error("expected two digits after '%'")),
        }
    }

    fn ring_bond(&mut self, number: u16) -> Result<(), SmilesError> {
        let current = self
            .prev
            .ok_or_else(|| self.error("ring bond without preceding atom"))?;

        match self.rings.remove(&number) {
            Some((opening, opening_kind)) => {
                if opening == current {
                    return Err(self.error("ring bond to itself"));
                }
                let written = match (opening_kind, self.pending.take()) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(self.error("conflicting ring bond symbols"))
                    }
                    (a, b) => a.or(b),
                };
                self.add_bond(opening, current, written)?;
            }
            None => {
                let kind = self.pending.take();
                self.rings.insert(number, (current, kind));
            }
        }
        Ok(())
    }

    fn push_atom(&mut self, atom: Atom) {
        let index = self.atoms.len();
        self.atoms.push(atom);
        if let Some(prev) = self.prev {
            let written = self.pending.take();
            // Cannot fail: a fresh atom has no bonds yet.
            let _ = self.add_bond(prev, index, written);
        }
        self.pending = None;
        self.prev = Some(index);
    }

    fn add_bond(
        &mut self,
        begin: usize,
        end: usize,
        written: Option<BondKind>,
    ) -> Result<(), SmilesError> {
        if self
            .bonds
            .iter()
            .any(|b| (b.begin == begin && b.end == end) || (b.begin == end && b.end == begin))
        {
            return Err(self.error("duplicate bond"));
        }
        let kind = written.unwrap_or(
            if self.atoms[begin].aromatic && self.atoms[end].aromatic {
                BondKind::Aromatic
            } else {
                BondKind::Single
            },
        );
        self.bonds.push(Bond {
            begin,
            end,
            kind,
            explicit: written.is_some(),
        });
        Ok(())
    }
}

fn capitalize(symbol: &str) -> String {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
