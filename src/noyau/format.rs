// src/noyau/format.rs
//
// Affichage d'un résultat.
// - entier           : décimal
// - flottant entier  : affiché comme l'entier exact (3.0 -> 3, 1e20 -> 100000000000000000000)
// - autre flottant   : chiffres les plus courts qui relisent la même valeur ;
//                      notation scientifique si l'exposant décimal est < -4 ou >= 16 (1e-05)

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{FromPrimitive, Signed};

use super::nombre::Nombre;

pub fn format_resultat(n: &Nombre) -> String {
    match n {
        Nombre::Entier(x) => x.to_string(),
        Nombre::Flottant(x) if x.is_finite() && x.fract() == 0.0 => match BigInt::from_f64(*x) {
            Some(i) => i.to_string(),
            None => repr_flottant(*x),
        },
        Nombre::Flottant(x) => repr_flottant(*x),
    }
}

/// Forme courte d'un flottant (1.5, 0.1, 1e-05, 1e+16, inf, nan).
pub fn repr_flottant(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // `{:e}` donne déjà les chiffres les plus courts : "-1.2345e-5"
    let sci = format!("{x:e}");
    let (mantisse, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    let (signe, mantisse) = match mantisse.strip_prefix('-') {
        Some(m) => ("-", m),
        None => ("", mantisse),
    };
    let chiffres: String = mantisse.chars().filter(|c| *c != '.').collect();
    let chiffres = departager(x.abs(), chiffres, exp);

    if !(-4..16).contains(&exp) {
        let (tete, queue) = chiffres.split_at(1);
        let corps = if queue.is_empty() {
            tete.to_string()
        } else {
            format!("{tete}.{queue}")
        };
        let signe_exp = if exp < 0 { '-' } else { '+' };
        return format!("{signe}{corps}e{signe_exp}{:02}", exp.abs());
    }

    if exp < 0 {
        let zeros = "0".repeat((-exp - 1) as usize);
        return format!("{signe}0.{zeros}{chiffres}");
    }

    let n_entiers = exp as usize + 1;
    if chiffres.len() <= n_entiers {
        let zeros = "0".repeat(n_entiers - chiffres.len());
        format!("{signe}{chiffres}{zeros}.0")
    } else {
        let (ent, frac) = chiffres.split_at(n_entiers);
        format!("{signe}{ent}.{frac}")
    }
}

/// Deux écritures les plus courtes peuvent relire `x` en étant aussi proches l'une
/// que l'autre (x = ...369.25 : "...369.2" et "...369.3") : on garde le dernier
/// chiffre pair. Une voisine strictement plus proche l'emporte toujours.
fn departager(x: f64, chiffres: String, exp: i32) -> String {
    let (Ok(n), Some(exact)) = (chiffres.parse::<u64>(), BigRational::from_float(x)) else {
        return chiffres;
    };
    let puissance = exp - (chiffres.len() as i32 - 1);
    let ecart = |m: u64| (valeur_decimale(m, puissance) - &exact).abs();
    let ecart_n = ecart(n);

    for voisin in [n.wrapping_sub(1), n + 1] {
        let texte = voisin.to_string();
        if texte.len() != chiffres.len() || texte.ends_with('0') {
            continue;
        }
        if format!("{texte}e{puissance}").parse::<f64>() != Ok(x) {
            continue;
        }
        let ecart_v = ecart(voisin);
        if ecart_v < ecart_n || (ecart_v == ecart_n && voisin % 2 == 0 && n % 2 == 1) {
            return texte;
        }
    }
    chiffres
}

/// m * 10^p, exact.
fn valeur_decimale(m: u64, p: i32) -> BigRational {
    let dix = BigInt::from(10u32).pow(p.unsigned_abs());
    if p >= 0 {
        BigRational::from_integer(BigInt::from(m) * dix)
    } else {
        BigRational::new(BigInt::from(m), dix)
    }
}
