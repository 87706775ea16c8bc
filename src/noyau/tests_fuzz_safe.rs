//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - on accepte les erreurs attendues (division par zéro, domaine, arguments, ...)
//! - invariant clé : même texte => même résultat (fonction pure)

use std::time::{Duration, Instant};

use super::{basculer_signe, evaluer, format_resultat, Categorie, ErreurEval};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d'expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 => "0".to_string(),
        1 => format!("{}", rng.pick(10)),
        2 => format!("{}", rng.pick(1000)),
        3 => format!("{}.{}", rng.pick(100), rng.pick(100)),
        4 => format!("{}e-{}", 1 + rng.pick(9), rng.pick(8)),
        _ => format!(".{}", rng.pick(1000)),
    }
}

fn gen_atome(rng: &mut Rng) -> String {
    let n = gen_nombre(rng);
    if rng.pick(4) == 0 {
        format!("-{n}")
    } else {
        n
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atome(rng);
    }

    let a = gen_expr(rng, depth - 1);
    match rng.pick(10) {
        0 => gen_atome(rng),
        1 => format!("({a}+{})", gen_expr(rng, depth - 1)),
        2 => format!("({a}-{})", gen_expr(rng, depth - 1)),
        3 => format!("({a}*{})", gen_expr(rng, depth - 1)),
        4 => format!("({a}/{})", gen_expr(rng, depth - 1)),
        5 => format!("({a}%{})", gen_expr(rng, depth - 1)),
        // exposant petit : pas d'explosion
        6 => format!("({a})**{}", rng.pick(4)),
        7 => format!("sqrt({a})"),
        8 => format!("abs({a})"),
        _ => {
            if rng.coin() {
                format!("round({a})")
            } else {
                format!("round({a}, {})", rng.pick(5))
            }
        }
    }
}

/// Expression qui s'évalue toujours : entiers/flottants positifs, + - *, abs, round.
fn gen_sure(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_nombre(rng);
    }
    let a = gen_sure(rng, depth - 1);
    match rng.pick(6) {
        0 => gen_nombre(rng),
        1 => format!("({a}+{})", gen_sure(rng, depth - 1)),
        2 => format!("({a}-{})", gen_sure(rng, depth - 1)),
        3 => format!("({a}*{})", gen_sure(rng, depth - 1)),
        4 => format!("abs(-{a})"),
        _ => format!("round({a}, {})", rng.pick(3)),
    }
}

/// Fragment hostile autour d'une base saine, avec le refus exact attendu.
fn gen_hostile(rng: &mut Rng) -> (String, ErreurEval) {
    let base = gen_sure(rng, 2);
    match rng.pick(8) {
        0 => (
            format!("__import__('os') + {base}"),
            ErreurEval::FonctionInterdite("__import__".into()),
        ),
        1 => (
            format!("{base}, {base}"),
            ErreurEval::ConstructionInterdite("les tuples ne sont pas permis".into()),
        ),
        2 => (
            format!("{base} // 2"),
            ErreurEval::OperateurInterdit("//".into()),
        ),
        3 => (format!("x.y({base})"), ErreurEval::AppelInterdit),
        4 => (
            format!("'s' * {base}"),
            ErreurEval::LitteralNonSupporte("\"s\"".into()),
        ),
        5 => (
            format!("{base} < 1"),
            ErreurEval::ExpressionNonSupportee("comparaison".into()),
        ),
        6 => (
            format!("[{base}]"),
            ErreurEval::ExpressionNonSupportee("liste".into()),
        ),
        _ => (format!("~{base}"), ErreurEval::OperateurInterdit("~".into())),
    }
}

fn is_erreur_attendue(e: &ErreurEval) -> bool {
    // Liste blanche : erreurs *normales* pour un fuzz sur domaine restreint.
    matches!(e, ErreurEval::Arithmetique(_) | ErreurEval::Arguments(_))
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_erreurs_attendues() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..200 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 5);
        let r1 = evaluer(&expr);
        let r2 = evaluer(&expr);

        match (&r1, &r2) {
            (Ok(a), Ok(b)) => {
                // même affichage (NaN != NaN en valeur, mais pas en texte)
                assert_eq!(format_resultat(a), format_resultat(b), "expr={expr:?}");
                seen_ok += 1;
            }
            (Err(e1), Err(e2)) => {
                assert_eq!(e1, e2, "expr={expr:?}");
                assert!(
                    is_erreur_attendue(e1),
                    "erreur non attendue: expr={expr:?} err={e1}"
                );
                seen_err += 1;
            }
            _ => panic!("résultats divergents pour expr={expr:?}: {r1:?} / {r2:?}"),
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 20, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_bases_saines_sans_erreur() {
    let mut rng = Rng::new(0x5A1E_u64);
    for _ in 0..100 {
        let expr = gen_sure(&mut rng, 3);
        assert!(evaluer(&expr).is_ok(), "expr={expr:?}");
    }
}

#[test]
fn fuzz_safe_hostile_refus_exact() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..120 {
        budget(t0, max);

        let (expr, attendue) = gen_hostile(&mut rng);
        match evaluer(&expr) {
            Ok(v) => panic!("expr={expr:?} acceptée: {v:?}"),
            Err(e) => {
                assert_eq!(e, attendue, "expr={expr:?}");
                assert_eq!(e.categorie(), Categorie::Politique, "expr={expr:?}");
            }
        }
    }
}

#[test]
fn fuzz_safe_bouton_signe_reste_lisible() {
    let mut rng = Rng::new(0x5EED_u64);

    for _ in 0..100 {
        let expr = gen_expr(&mut rng, 3);
        let bascule = basculer_signe(&expr);
        let retour = basculer_signe(&bascule);

        // jamais d'erreur de syntaxe introduite par le bouton
        if let Err(e) = evaluer(&bascule) {
            assert!(
                e.categorie() != Categorie::Syntaxe,
                "expr={expr:?} bascule={bascule:?} err={e}"
            );
        }
        // deux bascules = texte d'origine
        assert_eq!(retour, expr, "bascule={bascule:?}");
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    let expr = somme_balancee("1/2", 800);
    budget(t0, max);

    let v = evaluer(&expr).unwrap_or_else(|e| panic!("err: {e}"));

    // 800*(1/2) = 400
    assert_eq!(format_resultat(&v), "400");
}
