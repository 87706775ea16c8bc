// src/noyau/nombre.rs
//
// Valeurs numériques du noyau.
// - Entier   : entier illimité (BigInt)
// - Flottant : f64
//
// Règles de mélange : entier ∘ entier reste entier (sauf `/`), dès qu'un flottant
// intervient le résultat est flottant. La division `/` rend toujours un flottant.
//
// IMPORTANT (SAFE):
// - aucune opération ne panique : division par zéro, débordement, domaine => Err(..)
// - la croissance des entiers est bornée par `Limites::bits_max`

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};

use super::erreur::ErreurEval;
use super::limites::Limites;

#[derive(Clone, Debug, PartialEq)]
pub enum Nombre {
    Entier(BigInt),
    Flottant(f64),
}

impl From<i64> for Nombre {
    fn from(n: i64) -> Self {
        Nombre::Entier(BigInt::from(n))
    }
}

impl From<f64> for Nombre {
    fn from(x: f64) -> Self {
        Nombre::Flottant(x)
    }
}

impl Nombre {
    pub fn nom_type(&self) -> &'static str {
        match self {
            Nombre::Entier(_) => "entier",
            Nombre::Flottant(_) => "flottant",
        }
    }

    pub fn en_flottant(&self) -> Result<f64, ErreurEval> {
        match self {
            Nombre::Entier(n) => entier_vers_flottant(n),
            Nombre::Flottant(x) => Ok(*x),
        }
    }
}

fn entier_vers_flottant(n: &BigInt) -> Result<f64, ErreurEval> {
    match n.to_f64() {
        Some(x) if x.is_finite() => Ok(x),
        _ => Err(ErreurEval::arithmetique(
            "entier trop grand pour être converti en flottant",
        )),
    }
}

fn controle_bits(bits: u64, limites: &Limites) -> Result<(), ErreurEval> {
    if bits > limites.bits_max {
        return Err(ErreurEval::arithmetique(format!(
            "résultat entier trop grand (> {} bits)",
            limites.bits_max
        )));
    }
    Ok(())
}

/* ------------------------ Opérateurs binaires ------------------------ */

pub fn ajouter(a: Nombre, b: Nombre, _limites: &Limites) -> Result<Nombre, ErreurEval> {
    match (a, b) {
        (Nombre::Entier(x), Nombre::Entier(y)) => Ok(Nombre::Entier(x + y)),
        (a, b) => Ok(Nombre::Flottant(a.en_flottant()? + b.en_flottant()?)),
    }
}

pub fn soustraire(a: Nombre, b: Nombre, _limites: &Limites) -> Result<Nombre, ErreurEval> {
    match (a, b) {
        (Nombre::Entier(x), Nombre::Entier(y)) => Ok(Nombre::Entier(x - y)),
        (a, b) => Ok(Nombre::Flottant(a.en_flottant()? - b.en_flottant()?)),
    }
}

pub fn multiplier(a: Nombre, b: Nombre, limites: &Limites) -> Result<Nombre, ErreurEval> {
    match (a, b) {
        (Nombre::Entier(x), Nombre::Entier(y)) => {
            controle_bits(x.bits() + y.bits(), limites)?;
            Ok(Nombre::Entier(x * y))
        }
        (a, b) => Ok(Nombre::Flottant(a.en_flottant()? * b.en_flottant()?)),
    }
}

/// Division vraie : toujours un flottant.
/// Entier / entier passe par un rationnel exact, arrondi une seule fois.
pub fn diviser(a: Nombre, b: Nombre, _limites: &Limites) -> Result<Nombre, ErreurEval> {
    match (a, b) {
        (Nombre::Entier(x), Nombre::Entier(y)) => {
            if y.is_zero() {
                return Err(ErreurEval::arithmetique("division par zéro"));
            }
            match BigRational::new(x, y).to_f64() {
                Some(q) if q.is_finite() => Ok(Nombre::Flottant(q)),
                _ => Err(ErreurEval::arithmetique(
                    "quotient entier trop grand pour un flottant",
                )),
            }
        }
        (a, b) => {
            let x = a.en_flottant()?;
            let y = b.en_flottant()?;
            if y == 0.0 {
                return Err(ErreurEval::arithmetique("division par zéro"));
            }
            Ok(Nombre::Flottant(x / y))
        }
    }
}

/// Modulo “plancher” : le reste prend le signe du diviseur.
pub fn modulo(a: Nombre, b: Nombre, _limites: &Limites) -> Result<Nombre, ErreurEval> {
    match (a, b) {
        (Nombre::Entier(x), Nombre::Entier(y)) => {
            if y.is_zero() {
                return Err(ErreurEval::arithmetique("modulo par zéro"));
            }
            Ok(Nombre::Entier(x.mod_floor(&y)))
        }
        (a, b) => {
            let x = a.en_flottant()?;
            let y = b.en_flottant()?;
            if y == 0.0 {
                return Err(ErreurEval::arithmetique("modulo par zéro"));
            }
            let mut r = x % y;
            if r != 0.0 {
                if (y < 0.0) != (r < 0.0) {
                    r += y;
                }
            } else {
                r = 0.0_f64.copysign(y);
            }
            Ok(Nombre::Flottant(r))
        }
    }
}

pub fn puissance(a: Nombre, b: Nombre, limites: &Limites) -> Result<Nombre, ErreurEval> {
    match (a, b) {
        (Nombre::Entier(x), Nombre::Entier(n)) => {
            if n.is_negative() {
                // entier ** négatif => flottant
                let fx = entier_vers_flottant(&x)?;
                let fn_ = entier_vers_flottant(&n)?;
                return puissance_flottante(fx, fn_).map(Nombre::Flottant);
            }
            puissance_entiere(&x, &n, limites).map(Nombre::Entier)
        }
        (a, b) => {
            let x = a.en_flottant()?;
            let y = b.en_flottant()?;
            puissance_flottante(x, y).map(Nombre::Flottant)
        }
    }
}

fn puissance_entiere(x: &BigInt, n: &BigInt, limites: &Limites) -> Result<BigInt, ErreurEval> {
    // bases triviales : pas de croissance
    if x.is_zero() {
        return Ok(if n.is_zero() { BigInt::one() } else { BigInt::zero() });
    }
    if x.abs().is_one() {
        return Ok(if x.is_positive() || n.is_even() {
            BigInt::one()
        } else {
            -BigInt::one()
        });
    }

    let trop_grand = || {
        ErreurEval::arithmetique(format!(
            "résultat entier trop grand (> {} bits)",
            limites.bits_max
        ))
    };

    let e = n.to_u64().ok_or_else(trop_grand)?;
    // |x|^e occupe floor(e * log2|x|) + 1 bits
    if (e as f64 * log2_abs(x)).floor() + 1.0 > limites.bits_max as f64 {
        return Err(trop_grand());
    }
    let e = u32::try_from(e).map_err(|_| trop_grand())?;
    Ok(x.pow(e))
}

/// log2|x| à la précision d'un f64 (x non nul), même au-delà de f64::MAX.
fn log2_abs(x: &BigInt) -> f64 {
    let decalage = x.bits().saturating_sub(64);
    let tete = (x.magnitude() >> decalage).to_f64().unwrap_or(f64::MAX);
    tete.log2() + decalage as f64
}

fn puissance_flottante(x: f64, y: f64) -> Result<f64, ErreurEval> {
    if y == 0.0 {
        return Ok(1.0);
    }
    if x == 0.0 && y < 0.0 {
        return Err(ErreurEval::arithmetique(
            "zéro ne peut pas être élevé à une puissance négative",
        ));
    }
    if x < 0.0 && x.is_finite() && y.is_finite() && y.fract() != 0.0 {
        return Err(ErreurEval::arithmetique(
            "résultat complexe (base négative, exposant non entier)",
        ));
    }
    let r = x.powf(y);
    if r.is_infinite() && x.is_finite() && y.is_finite() {
        return Err(ErreurEval::arithmetique("dépassement de capacité flottante"));
    }
    Ok(r)
}

/* ------------------------ Opérateurs unaires ------------------------ */

pub fn negatif(a: Nombre) -> Result<Nombre, ErreurEval> {
    Ok(match a {
        Nombre::Entier(x) => Nombre::Entier(-x),
        Nombre::Flottant(x) => Nombre::Flottant(-x),
    })
}

pub fn identite(a: Nombre) -> Result<Nombre, ErreurEval> {
    Ok(a)
}

/* ------------------------ Fonctions ------------------------ */

fn arite(nom: &str, args: &[Nombre], min: usize, max: usize) -> Result<(), ErreurEval> {
    let n = args.len();
    if n < min || n > max {
        let attendu = if min == max {
            format!("exactement {min}")
        } else {
            format!("entre {min} et {max}")
        };
        return Err(ErreurEval::arguments(format!(
            "{nom}() attend {attendu} argument(s), reçu {n}"
        )));
    }
    Ok(())
}

pub fn racine(args: Vec<Nombre>) -> Result<Nombre, ErreurEval> {
    arite("sqrt", &args, 1, 1)?;
    let x = args[0].en_flottant()?;
    if x < 0.0 {
        return Err(ErreurEval::arithmetique(
            "sqrt() hors domaine (argument négatif)",
        ));
    }
    Ok(Nombre::Flottant(x.sqrt()))
}

pub fn valeur_absolue(args: Vec<Nombre>) -> Result<Nombre, ErreurEval> {
    arite("abs", &args, 1, 1)?;
    let mut args = args;
    Ok(match args.remove(0) {
        Nombre::Entier(x) => Nombre::Entier(x.abs()),
        Nombre::Flottant(x) => Nombre::Flottant(x.abs()),
    })
}

/// round(x) -> entier (demi vers le pair) ; round(x, n) garde le type de x.
pub fn arrondi(args: Vec<Nombre>) -> Result<Nombre, ErreurEval> {
    arite("round", &args, 1, 2)?;
    let mut it = args.into_iter();
    let (Some(x), chiffres) = (it.next(), it.next()) else {
        return Err(ErreurEval::arguments("round() sans argument"));
    };

    let chiffres = match chiffres {
        None => None,
        Some(Nombre::Entier(n)) => Some(n),
        Some(autre) => {
            return Err(ErreurEval::arguments(format!(
                "round() : le nombre de chiffres doit être un entier (reçu {})",
                autre.nom_type()
            )))
        }
    };

    match (x, chiffres) {
        (Nombre::Entier(x), None) => Ok(Nombre::Entier(x)),
        (Nombre::Entier(x), Some(n)) => Ok(Nombre::Entier(arrondi_entier(x, &n))),
        (Nombre::Flottant(x), None) => {
            if x.is_nan() {
                return Err(ErreurEval::arithmetique("round() : NaN n'a pas d'entier"));
            }
            if x.is_infinite() {
                return Err(ErreurEval::arithmetique(
                    "round() : l'infini n'a pas d'entier",
                ));
            }
            BigInt::from_f64(x.round_ties_even())
                .map(Nombre::Entier)
                .ok_or_else(|| ErreurEval::arithmetique("round() : conversion impossible"))
        }
        (Nombre::Flottant(x), Some(n)) => arrondi_flottant(x, &n).map(Nombre::Flottant),
    }
}

/// Arrondi d'un entier à 10^(-n) près (seuls les n négatifs changent la valeur).
fn arrondi_entier(x: BigInt, n: &BigInt) -> BigInt {
    if !n.is_negative() {
        return x;
    }
    // 10^k >= 8^k > 2|x| dès que 3k > bits(x)+1 : le résultat est 0
    let k = match n.abs().to_u64() {
        Some(k) if k.saturating_mul(3) <= x.bits() + 1 => k,
        _ => return BigInt::zero(),
    };
    let Ok(k) = u32::try_from(k) else {
        return BigInt::zero();
    };

    let m = BigInt::from(10u32).pow(k);
    let (mut q, r) = x.div_mod_floor(&m);
    let double = &r * 2u32;
    if double > m || (double == m && q.is_odd()) {
        q += 1u32;
    }
    q * m
}

/// Au-delà, un f64 n'a plus de chiffre à arrondir.
const CHIFFRES_FLOTTANT_MAX: i64 = 330;

fn arrondi_flottant(x: f64, n: &BigInt) -> Result<f64, ErreurEval> {
    if !x.is_finite() || x == 0.0 {
        return Ok(x);
    }
    let n = match n.to_i64() {
        Some(n) => n,
        None if n.is_positive() => return Ok(x),
        None => return Ok(0.0_f64.copysign(x)),
    };

    if n > CHIFFRES_FLOTTANT_MAX {
        return Ok(x);
    }
    if n < -CHIFFRES_FLOTTANT_MAX {
        return Ok(0.0_f64.copysign(x));
    }

    let r = if n >= 0 {
        // arrondi décimal exact via le formatage (valeur binaire exacte)
        let texte = format!("{:.*}", n as usize, x);
        texte
            .parse::<f64>()
            .map_err(|_| ErreurEval::arithmetique("round() : conversion impossible"))?
    } else {
        arrondi_dizaines(x, (-n) as u32)
    };

    if r.is_infinite() {
        return Err(ErreurEval::arithmetique("round() : dépassement de capacité"));
    }
    Ok(r)
}

/// Arrondi au multiple de 10^k le plus proche (demi vers le pair), calculé sur la
/// valeur binaire exacte de `x` : une seule conversion vers f64, à la fin.
fn arrondi_dizaines(x: f64, k: u32) -> f64 {
    let Some(exact) = BigRational::from_float(x) else {
        return x;
    };
    let m = BigInt::from(10u32).pow(k);
    let q = exact / BigRational::from_integer(m.clone());

    let plancher = q.floor();
    let reste = &q - &plancher;
    let mut n = plancher.to_integer();
    let demi = BigRational::new(BigInt::one(), BigInt::from(2u32));
    if reste > demi || (reste == demi && n.is_odd()) {
        n += 1u32;
    }

    match (n * m).to_f64() {
        Some(r) if r == 0.0 => 0.0_f64.copysign(x),
        Some(r) => r,
        None => f64::INFINITY.copysign(x),
    }
}
