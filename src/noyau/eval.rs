//! Noyau — évaluation (pipeline réel)
//!
//! texte -> jetons -> Expr -> parcours restreint -> Nombre
//!
//! Contrats :
//! - fonction pure : aucun état caché, aucune E/S, même texte => même résultat
//! - seul le code des tables (tables.rs) est exécuté, quel que soit le texte
//! - opérateur vérifié AVANT l'évaluation de ses opérandes

use super::erreur::ErreurEval;
use super::expr::{Expr, Litteral};
use super::jetons::tokenize;
use super::limites::Limites;
use super::nombre::Nombre;
use super::syntaxe::parse;
use super::tables::{fonction, operateur_binaire, operateur_unaire, FnBinaire};

/// API publique : évalue une expression avec les garde-fous par défaut.
pub fn evaluer(texte: &str) -> Result<Nombre, ErreurEval> {
    evaluer_avec(texte, &Limites::default())
}

/// Évalue une expression avec des garde-fous explicites.
pub fn evaluer_avec(texte: &str, limites: &Limites) -> Result<Nombre, ErreurEval> {
    if texte.len() > limites.longueur_max {
        return Err(ErreurEval::syntaxe(
            format!("entrée trop longue (> {} octets)", limites.longueur_max),
            limites.longueur_max,
        ));
    }

    let jetons = tokenize(texte)?;
    let arbre = parse(&jetons, texte.len(), limites.profondeur_max)?;
    evaluer_arbre(&arbre, limites)
}

/// Parcours récursif de l'arbre, un cas par genre de noeud (pas de cas “par défaut”).
pub fn evaluer_arbre(expr: &Expr, limites: &Limites) -> Result<Nombre, ErreurEval> {
    match expr {
        Expr::Litteral(l) => litteral(l),

        Expr::Binaire { .. } => binaire(expr, limites),

        Expr::Unaire { op, operande } => {
            let f = operateur_unaire(*op)
                .ok_or_else(|| ErreurEval::OperateurInterdit(op.symbole().to_string()))?;
            let x = evaluer_arbre(operande, limites)?;
            f(x)
        }

        Expr::Appel {
            appele,
            args,
            nommes,
        } => appel(appele, args, nommes, limites),

        Expr::Tuple(_) => Err(ErreurEval::ConstructionInterdite(
            "les tuples ne sont pas permis".into(),
        )),

        Expr::Nom(_)
        | Expr::Attribut { .. }
        | Expr::Indice { .. }
        | Expr::Liste(_)
        | Expr::Comparaison { .. }
        | Expr::Logique { .. } => Err(ErreurEval::ExpressionNonSupportee(
            expr.genre().to_string(),
        )),
    }
}

fn litteral(l: &Litteral) -> Result<Nombre, ErreurEval> {
    match l {
        Litteral::Entier(n) => Ok(Nombre::Entier(n.clone())),
        Litteral::Flottant(x) => Ok(Nombre::Flottant(*x)),
        Litteral::Complexe(_) | Litteral::Chaine(_) | Litteral::Booleen(_) | Litteral::Rien => {
            Err(ErreurEval::LitteralNonSupporte(l.to_string()))
        }
    }
}

/// Chaîne binaire évaluée le long de sa colonne gauche, sans récursion sur la gauche.
///
/// Ordre identique à la récursion naïve :
/// 1) opérateurs vérifiés de la racine vers la feuille
/// 2) feuille gauche évaluée
/// 3) puis, en remontant : opérande droite, application
fn binaire(racine: &Expr, limites: &Limites) -> Result<Nombre, ErreurEval> {
    let mut colonne: Vec<(FnBinaire, &Expr)> = Vec::new();

    let mut e = racine;
    while let Expr::Binaire { op, gauche, droite } = e {
        let f = operateur_binaire(*op)
            .ok_or_else(|| ErreurEval::OperateurInterdit(op.symbole().to_string()))?;
        colonne.push((f, droite.as_ref()));
        e = gauche.as_ref();
    }

    let mut acc = evaluer_arbre(e, limites)?;
    for (f, droite) in colonne.into_iter().rev() {
        let d = evaluer_arbre(droite, limites)?;
        acc = f(acc, d, limites)?;
    }
    Ok(acc)
}

fn appel(
    appele: &Expr,
    args: &[Expr],
    nommes: &[String],
    limites: &Limites,
) -> Result<Nombre, ErreurEval> {
    // seul un nom nu est appelable (pas a.b(...), pas f(..)(..))
    let Expr::Nom(nom) = appele else {
        return Err(ErreurEval::AppelInterdit);
    };

    let f = fonction(nom).ok_or_else(|| ErreurEval::FonctionInterdite(nom.clone()))?;

    if !nommes.is_empty() {
        return Err(ErreurEval::arguments(format!(
            "{nom}() : arguments nommés non supportés ({})",
            nommes.join(", ")
        )));
    }

    // un seul étage de pile par appel imbriqué
    let mut valeurs = Vec::with_capacity(args.len());
    for a in args {
        valeurs.push(evaluer_arbre(a, limites)?);
    }
    f(valeurs)
}
