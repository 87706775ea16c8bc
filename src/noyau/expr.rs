// src/noyau/expr.rs
//
// Arbre d'expression (immuable, jeté après évaluation).
//
// La grammaire lit plus large que ce que l'évaluateur accepte :
// - Litteral / Binaire / Unaire / Appel : les quatre formes évaluables
// - Tuple : toujours refusé (construction interdite)
// - Nom, Attribut, Indice, Liste, Comparaison, Logique : lues pour pouvoir être
//   refusées proprement (expression non supportée), jamais exécutées.

use num_bigint::BigInt;

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum Litteral {
    Entier(BigInt),
    Flottant(f64),
    /// Imaginaire pur (ex: 3j).
    Complexe(f64),
    Chaine(String),
    Booleen(bool),
    Rien,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpBinaire {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    DivEntiere,
    MatMul,
    EtBit,
    OuBit,
    OuExclBit,
    DecalGauche,
    DecalDroite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpUnaire {
    Neg,
    Pos,
    Inversion,
    Non,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpComparaison {
    Egal,
    Different,
    Inferieur,
    InferieurEgal,
    Superieur,
    SuperieurEgal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpLogique {
    Et,
    Ou,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Litteral(Litteral),
    Binaire {
        op: OpBinaire,
        gauche: Box<Expr>,
        droite: Box<Expr>,
    },
    Unaire {
        op: OpUnaire,
        operande: Box<Expr>,
    },
    Appel {
        appele: Box<Expr>,
        args: Vec<Expr>,
        /// Noms des arguments nommés (`f(x, n=2)`), conservés pour le refus.
        nommes: Vec<String>,
    },
    Tuple(Vec<Expr>),

    Nom(String),
    Attribut {
        objet: Box<Expr>,
        nom: String,
    },
    Indice {
        objet: Box<Expr>,
        indice: Box<Expr>,
    },
    Liste(Vec<Expr>),
    Comparaison {
        op: OpComparaison,
        gauche: Box<Expr>,
        droite: Box<Expr>,
    },
    Logique {
        op: OpLogique,
        gauche: Box<Expr>,
        droite: Box<Expr>,
    },
}

impl Expr {
    pub fn binaire(op: OpBinaire, gauche: Expr, droite: Expr) -> Expr {
        Expr::Binaire {
            op,
            gauche: Box::new(gauche),
            droite: Box::new(droite),
        }
    }

    pub fn unaire(op: OpUnaire, operande: Expr) -> Expr {
        Expr::Unaire {
            op,
            operande: Box::new(operande),
        }
    }

    pub fn entier(n: i64) -> Expr {
        Expr::Litteral(Litteral::Entier(BigInt::from(n)))
    }

    pub fn flottant(x: f64) -> Expr {
        Expr::Litteral(Litteral::Flottant(x))
    }

    /// Nom court du genre de noeud (messages d'erreur).
    pub fn genre(&self) -> &'static str {
        match self {
            Expr::Litteral(_) => "littéral",
            Expr::Binaire { .. } => "opération binaire",
            Expr::Unaire { .. } => "opération unaire",
            Expr::Appel { .. } => "appel",
            Expr::Tuple(_) => "tuple",
            Expr::Nom(_) => "nom",
            Expr::Attribut { .. } => "attribut",
            Expr::Indice { .. } => "indice",
            Expr::Liste(_) => "liste",
            Expr::Comparaison { .. } => "comparaison",
            Expr::Logique { .. } => "opération logique",
        }
    }
}

/// Destruction sans récursion : une chaîne de 5000 termes (1+1+...) ou de
/// trailers (f()()()...) ne doit pas épuiser la pile en fin d'évaluation.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pile = Vec::new();
        detacher_enfants(self, &mut pile);
        while let Some(mut e) = pile.pop() {
            detacher_enfants(&mut e, &mut pile);
        }
    }
}

/// Sort les enfants composés de `e` (remplacés par une feuille vide) vers `pile`.
fn detacher_enfants(e: &mut Expr, pile: &mut Vec<Expr>) {
    match e {
        Expr::Litteral(_) | Expr::Nom(_) => {}
        Expr::Binaire { gauche, droite, .. }
        | Expr::Comparaison { gauche, droite, .. }
        | Expr::Logique { gauche, droite, .. }
        | Expr::Indice {
            objet: gauche,
            indice: droite,
        } => {
            detacher(gauche, pile);
            detacher(droite, pile);
        }
        Expr::Unaire { operande: x, .. } | Expr::Attribut { objet: x, .. } => detacher(x, pile),
        Expr::Appel { appele, args, .. } => {
            detacher(appele, pile);
            pile.append(args);
        }
        Expr::Tuple(items) | Expr::Liste(items) => pile.append(items),
    }
}

fn detacher(enfant: &mut Expr, pile: &mut Vec<Expr>) {
    if !matches!(enfant, Expr::Litteral(_) | Expr::Nom(_)) {
        pile.push(std::mem::replace(enfant, Expr::Nom(String::new())));
    }
}

impl OpBinaire {
    pub fn symbole(self) -> &'static str {
        match self {
            OpBinaire::Add => "+",
            OpBinaire::Sub => "-",
            OpBinaire::Mul => "*",
            OpBinaire::Div => "/",
            OpBinaire::Mod => "%",
            OpBinaire::Pow => "**",
            OpBinaire::DivEntiere => "//",
            OpBinaire::MatMul => "@",
            OpBinaire::EtBit => "&",
            OpBinaire::OuBit => "|",
            OpBinaire::OuExclBit => "^",
            OpBinaire::DecalGauche => "<<",
            OpBinaire::DecalDroite => ">>",
        }
    }
}

impl OpUnaire {
    pub fn symbole(self) -> &'static str {
        match self {
            OpUnaire::Neg => "-",
            OpUnaire::Pos => "+",
            OpUnaire::Inversion => "~",
            OpUnaire::Non => "not",
        }
    }
}

impl fmt::Display for Litteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Litteral::Entier(n) => write!(f, "{n}"),
            Litteral::Flottant(x) => write!(f, "{x:?}"),
            Litteral::Complexe(x) => write!(f, "{x:?}j"),
            Litteral::Chaine(s) => write!(f, "{s:?}"),
            Litteral::Booleen(true) => write!(f, "True"),
            Litteral::Booleen(false) => write!(f, "False"),
            Litteral::Rien => write!(f, "None"),
        }
    }
}
