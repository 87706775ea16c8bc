// src/noyau/tables.rs
//
// Listes blanches : tout ce que l'évaluateur a le droit d'exécuter est ici.
// Tables statiques, jamais modifiées, jamais reconstruites à chaque appel.
// Un opérateur ou un nom absent => refus (l'évaluateur n'essaie rien d'autre).

use super::erreur::ErreurEval;
use super::expr::{OpBinaire, OpUnaire};
use super::limites::Limites;
use super::nombre::{self, Nombre};

pub type FnBinaire = fn(Nombre, Nombre, &Limites) -> Result<Nombre, ErreurEval>;
pub type FnUnaire = fn(Nombre) -> Result<Nombre, ErreurEval>;
pub type FnFonction = fn(Vec<Nombre>) -> Result<Nombre, ErreurEval>;

static OPERATEURS_BINAIRES: [(OpBinaire, FnBinaire); 6] = [
    (OpBinaire::Add, nombre::ajouter),
    (OpBinaire::Sub, nombre::soustraire),
    (OpBinaire::Mul, nombre::multiplier),
    (OpBinaire::Div, nombre::diviser),
    (OpBinaire::Mod, nombre::modulo),
    (OpBinaire::Pow, nombre::puissance),
];

static OPERATEURS_UNAIRES: [(OpUnaire, FnUnaire); 2] = [
    (OpUnaire::Neg, nombre::negatif),
    (OpUnaire::Pos, nombre::identite),
];

static FONCTIONS: [(&str, FnFonction); 3] = [
    ("sqrt", nombre::racine),
    ("abs", nombre::valeur_absolue),
    ("round", nombre::arrondi),
];

pub fn operateur_binaire(op: OpBinaire) -> Option<FnBinaire> {
    OPERATEURS_BINAIRES
        .iter()
        .find(|(o, _)| *o == op)
        .map(|&(_, f)| f)
}

pub fn operateur_unaire(op: OpUnaire) -> Option<FnUnaire> {
    OPERATEURS_UNAIRES
        .iter()
        .find(|(o, _)| *o == op)
        .map(|&(_, f)| f)
}

pub fn fonction(nom: &str) -> Option<FnFonction> {
    FONCTIONS.iter().find(|(n, _)| *n == nom).map(|&(_, f)| f)
}

/// Noms des fonctions permises (aide affichée par l'interface).
pub fn noms_fonctions() -> impl Iterator<Item = &'static str> {
    FONCTIONS.iter().map(|&(n, _)| n)
}
