// src/noyau/erreur.rs
//
// Erreurs du noyau.
// Trois familles :
// - Syntaxe    : le texte ne se lit pas
// - Politique  : texte lisible, mais hors liste blanche
// - Numérique  : opération permise, opérande invalide (division par zéro, ...)
//
// Aucune de ces erreurs n'est fatale : le noyau rend Err(..), il ne panique jamais.

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Categorie {
    Syntaxe,
    Politique,
    Numerique,
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ErreurEval {
    #[error("erreur de syntaxe (position {position}) : {message}")]
    Syntaxe { message: String, position: usize },

    #[error("littéral non supporté : {0}")]
    LitteralNonSupporte(String),

    #[error("opérateur interdit : {0}")]
    OperateurInterdit(String),

    #[error("seuls les appels simples nom(...) sont permis")]
    AppelInterdit,

    #[error("fonction interdite : {0}")]
    FonctionInterdite(String),

    #[error("construction interdite : {0}")]
    ConstructionInterdite(String),

    #[error("expression non supportée : {0}")]
    ExpressionNonSupportee(String),

    #[error("arguments invalides : {0}")]
    Arguments(String),

    #[error("erreur arithmétique : {0}")]
    Arithmetique(String),
}

impl ErreurEval {
    pub fn syntaxe(message: impl Into<String>, position: usize) -> Self {
        ErreurEval::Syntaxe {
            message: message.into(),
            position,
        }
    }

    pub fn arithmetique(message: impl Into<String>) -> Self {
        ErreurEval::Arithmetique(message.into())
    }

    pub fn arguments(message: impl Into<String>) -> Self {
        ErreurEval::Arguments(message.into())
    }

    pub fn categorie(&self) -> Categorie {
        match self {
            ErreurEval::Syntaxe { .. } => Categorie::Syntaxe,
            ErreurEval::LitteralNonSupporte(_)
            | ErreurEval::OperateurInterdit(_)
            | ErreurEval::AppelInterdit
            | ErreurEval::FonctionInterdite(_)
            | ErreurEval::ConstructionInterdite(_)
            | ErreurEval::ExpressionNonSupportee(_)
            | ErreurEval::Arguments(_) => Categorie::Politique,
            ErreurEval::Arithmetique(_) => Categorie::Numerique,
        }
    }
}
