// src/noyau/signe.rs
//
// Bouton +/- : change le signe du DERNIER nombre de l'entrée.
// Réécriture jeton par jeton, avec la grammaire du noyau :
// - N        -> -(N)
// - -(N)     -> N      (seulement si ce '-' est unaire)
// Entrée illisible ou sans nombre : rendue telle quelle.

use super::jetons::{tokenize, Jeton, Tok};

pub fn basculer_signe(entree: &str) -> String {
    let s = entree.trim_end();
    let Ok(jetons) = tokenize(s) else {
        return s.to_string();
    };
    let Some(k) = jetons.iter().rposition(|j| j.tok.est_nombre()) else {
        return s.to_string();
    };

    let n = &jetons[k];
    let nombre = &s[n.debut..n.fin];

    let enveloppe = k >= 2
        && jetons[k - 1].tok == Tok::LPar
        && jetons[k - 2].tok == Tok::Moins
        && jetons.get(k + 1).map(|j| &j.tok) == Some(&Tok::RPar)
        && moins_unaire(&jetons, k - 2);

    if enveloppe {
        let debut = jetons[k - 2].debut;
        let fin = jetons[k + 1].fin;
        return format!("{}{}{}", &s[..debut], nombre, &s[fin..]);
    }

    format!("{}-({}){}", &s[..n.debut], nombre, &s[n.fin..])
}

/// Le '-' d'indice `i` est unaire s'il ne suit pas une valeur.
fn moins_unaire(jetons: &[Jeton], i: usize) -> bool {
    match i.checked_sub(1).map(|p| &jetons[p].tok) {
        None => true,
        Some(t) => !(t.est_nombre()
            || matches!(
                t,
                Tok::Ident(_) | Tok::Chaine(_) | Tok::RPar | Tok::RCroch
            )),
    }
}
