//! Noyau sûr (évaluateur restreint)
//!
//! Organisation interne :
//! - jetons.rs   : découpage du texte (positions en octets)
//! - syntaxe.rs  : descente récursive -> Expr
//! - expr.rs     : arbre d'expression
//! - tables.rs   : listes blanches (opérateurs, fonctions)
//! - nombre.rs   : entiers illimités / flottants, opérations
//! - eval.rs     : pipeline complet
//! - format.rs   : affichage d'un résultat
//! - signe.rs    : bouton +/- (réécriture par jetons)
//! - limites.rs  : garde-fous (longueur, imbrication, taille des entiers)
//! - erreur.rs   : erreurs typées

pub mod erreur;
pub mod eval;
pub mod expr;
pub mod format;
pub mod jetons;
pub mod limites;
pub mod nombre;
pub mod signe;
pub mod syntaxe;
pub mod tables;

#[cfg(test)]
mod tests_securite;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use erreur::{Categorie, ErreurEval};
pub use eval::{evaluer, evaluer_avec};
pub use format::format_resultat;
pub use limites::Limites;
pub use nombre::Nombre;
pub use signe::basculer_signe;
