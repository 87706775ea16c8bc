//! Tests de sécurité (campagne) : la liste blanche tient, quel que soit le texte.
//!
//! Invariants visés :
//! - aucune entrée hostile n'exécute autre chose que les tables
//! - chaque refus tombe dans la bonne famille (syntaxe / politique / numérique)
//! - une erreur n'est jamais une panique

use std::time::{Duration, Instant};

use super::limites::{PROFONDEUR_DEFAUT, PROFONDEUR_PLAFOND};
use super::{evaluer, evaluer_avec, format_resultat, Categorie, ErreurEval, Limites, Nombre};

const UN_MO: usize = 1 << 20;
const DEUX_MO: usize = 2 << 20;

fn refus(expr: &str) -> ErreurEval {
    match evaluer(expr) {
        Ok(v) => panic!("expr={expr:?} aurait dû être refusée, a rendu {v:?}"),
        Err(e) => e,
    }
}

fn assert_categorie(expr: &str, attendue: Categorie) {
    let e = refus(expr);
    assert_eq!(e.categorie(), attendue, "expr={expr:?} err={e}");
}

fn affiche(expr: &str) -> String {
    let v = evaluer(expr).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"));
    format_resultat(&v)
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/// Évalue dans un fil à pile fixe : un débordement y abat tout le binaire de test.
fn sur_pile(octets: usize, limites: Limites, expr: String) -> Result<Nombre, ErreurEval> {
    std::thread::Builder::new()
        .stack_size(octets)
        .spawn(move || evaluer_avec(&expr, &limites))
        .unwrap_or_else(|e| panic!("fil d'évaluation: {e}"))
        .join()
        .unwrap_or_else(|_| panic!("panique dans le fil d'évaluation"))
}

/// Formes imbriquées exactement `n` fois, toutes évaluables.
fn formes_imbriquees(n: usize) -> Vec<String> {
    vec![
        format!("{}1{}", "(".repeat(n), ")".repeat(n)),
        format!("{}1", "-".repeat(n)),
        format!("{}1{}", "abs(".repeat(n), ")".repeat(n)),
        format!("1{}", "**1".repeat(n)),
        format!("{}1{}", "1+(".repeat(n), ")".repeat(n)),
        format!("{}1{}", "round(".repeat(n), ", 0)".repeat(n)),
    ]
}

/* ------------------------ Entrées hostiles ------------------------ */

#[test]
fn sec_injections_classiques() {
    for expr in [
        "__import__('os').system('ls')",
        "__import__('os')",
        "open('/etc/passwd')",
        "exec('1')",
        "eval('1+1')",
        "getattr(1, 'real')",
        "globals()",
        "print(1)",
        "compile('1', 'x', 'eval')",
        "type(1)",
    ] {
        assert!(
            matches!(
                refus(expr),
                ErreurEval::FonctionInterdite(_) | ErreurEval::AppelInterdit
            ),
            "expr={expr:?}"
        );
    }
}

#[test]
fn sec_acces_par_attribut() {
    for expr in [
        "(1).__class__",
        "().__class__.__bases__",
        "math.pi",
        "sqrt.__globals__",
    ] {
        let e = refus(expr);
        assert!(
            matches!(
                e,
                ErreurEval::ExpressionNonSupportee(_) | ErreurEval::ConstructionInterdite(_)
            ),
            "expr={expr:?} err={e:?}"
        );
    }

    for expr in ["(1).bit_length()", "math.sqrt(4)", "abs.__call__(1)"] {
        assert_eq!(refus(expr), ErreurEval::AppelInterdit, "expr={expr:?}");
    }
}

#[test]
fn sec_familles_d_erreurs() {
    assert_categorie("2 +", Categorie::Syntaxe);
    assert_categorie("import os", Categorie::Syntaxe);
    assert_categorie("x = 1", Categorie::Syntaxe);
    assert_categorie("1; 2", Categorie::Syntaxe);

    assert_categorie("'a' * 3", Categorie::Politique);
    assert_categorie("2 // 3", Categorie::Politique);
    assert_categorie("max(1, 2)", Categorie::Politique);
    assert_categorie("2, 3", Categorie::Politique);
    assert_categorie("[1][0]", Categorie::Politique);
    assert_categorie("sqrt(1, 2)", Categorie::Politique);

    assert_categorie("1/0", Categorie::Numerique);
    assert_categorie("5 % 0", Categorie::Numerique);
    assert_categorie("sqrt(-4)", Categorie::Numerique);
    assert_categorie("round(1e308 * 10)", Categorie::Numerique);
}

#[test]
fn sec_proprietes_de_base() {
    assert_eq!(affiche("2+3*4"), "14");
    assert_eq!(affiche("(2+3)*4"), "20");
    assert_eq!(affiche("sqrt(9)"), "3");
    assert_eq!(affiche("10/4"), "2.5");
    assert_eq!(affiche("-7 % 3"), "2");
    assert_eq!(affiche("round(2.5) + round(3.5)"), "6");
    assert_eq!(affiche("abs(-2.5) * 2"), "5");
}

/* ------------------------ Garde-fous ------------------------ */

#[test]
fn sec_imbrication_profonde_refusee_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let expr = format!("{}1{}", "(".repeat(5_000), ")".repeat(5_000));
    budget(t0, max);
    assert_categorie(&expr, Categorie::Syntaxe);

    let expr = format!("{}1", "-".repeat(5_000));
    assert_categorie(&expr, Categorie::Syntaxe);

    let expr = format!("{}1{}", "abs(".repeat(1_000), ")".repeat(1_000));
    assert_categorie(&expr, Categorie::Syntaxe);
    budget(t0, max);
}

#[test]
fn sec_imbrication_permise_tient_dans_un_mo() {
    // n niveaux + l'expression elle-même = PROFONDEUR_DEFAUT
    for expr in formes_imbriquees(PROFONDEUR_DEFAUT - 1) {
        let r = sur_pile(UN_MO, Limites::default(), expr.clone());
        assert!(r.is_ok(), "expr={expr:?} => {r:?}");
    }

    let nots = format!("{}1", "not ".repeat(PROFONDEUR_DEFAUT - 1));
    let r = sur_pile(UN_MO, Limites::default(), nots);
    assert!(matches!(r, Err(ErreurEval::OperateurInterdit(_))), "{r:?}");

    // un cran de plus : refus propre
    for expr in formes_imbriquees(PROFONDEUR_DEFAUT) {
        let r = sur_pile(UN_MO, Limites::default(), expr.clone());
        assert!(
            matches!(r, Err(ErreurEval::Syntaxe { .. })),
            "expr={expr:?} => {r:?}"
        );
    }
}

#[test]
fn sec_plafond_d_imbrication_tient_dans_deux_mo() {
    let limites = Limites::default().avec_profondeur(PROFONDEUR_PLAFOND);
    for expr in formes_imbriquees(PROFONDEUR_PLAFOND - 1) {
        let r = sur_pile(DEUX_MO, limites, expr.clone());
        assert!(r.is_ok(), "expr={expr:?} => {r:?}");
    }
}

#[test]
fn sec_longues_chaines_a_gauche_sans_pile() {
    // ~5000 noeuds en colonne gauche : ni l'analyse, ni l'évaluation,
    // ni la destruction de l'arbre ne récursent dessus
    let somme = "1+".repeat(4_999) + "1";
    assert_eq!(
        sur_pile(UN_MO, Limites::default(), somme),
        Ok(Nombre::from(5_000))
    );

    let appels = "f".to_string() + &"()".repeat(4_999);
    assert_eq!(
        sur_pile(UN_MO, Limites::default(), appels),
        Err(ErreurEval::AppelInterdit)
    );

    let attributs = "x".to_string() + &".y".repeat(4_999);
    assert!(matches!(
        sur_pile(UN_MO, Limites::default(), attributs),
        Err(ErreurEval::ExpressionNonSupportee(_))
    ));
}

#[test]
fn sec_croissance_bornee() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    assert_categorie("9**9**9", Categorie::Numerique);
    assert_categorie("(10**20000)**10", Categorie::Numerique);
    assert_categorie("3**50000 * 3**50000", Categorie::Numerique);
    budget(t0, max);
}

#[test]
fn sec_entree_geante() {
    let expr = "1+".repeat(20_000) + "1";
    assert_categorie(&expr, Categorie::Syntaxe);
}
