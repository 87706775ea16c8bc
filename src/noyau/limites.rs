//! Garde-fous du noyau (anti-gel / anti-pile).
//!
//! Les valeurs par défaut suffisent pour un usage calculatrice ;
//! l'application peut les resserrer ou les relâcher dans des bornes fixes.

/// Longueur maximale de l'entrée (octets).
pub const LONGUEUR_DEFAUT: usize = 10_000;

/// Imbrication maximale (parenthèses, opérateurs unaires, appels...).
/// Tient dans une pile de 1 Mo en debug (fil principal sous Windows).
pub const PROFONDEUR_DEFAUT: usize = 64;

/// Plafond absolu de l'imbrication, mesuré pour une pile de 2 Mo en debug
/// (taille par défaut d'un fil `std::thread`).
pub const PROFONDEUR_PLAFOND: usize = 100;

/// Taille maximale (en bits) d'un entier produit par `**`.
pub const BITS_DEFAUT: u64 = 100_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limites {
    pub longueur_max: usize,
    pub profondeur_max: usize,
    pub bits_max: u64,
}

impl Default for Limites {
    fn default() -> Self {
        Self {
            longueur_max: LONGUEUR_DEFAUT,
            profondeur_max: PROFONDEUR_DEFAUT,
            bits_max: BITS_DEFAUT,
        }
    }
}

impl Limites {
    pub fn avec_profondeur(mut self, profondeur: usize) -> Self {
        self.profondeur_max = profondeur.clamp(1, PROFONDEUR_PLAFOND);
        self
    }

    /// Lit `CALCULATRICE_PROFONDEUR_MAX` si présente et valide ; sinon défauts.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn depuis_env() -> Self {
        let base = Self::default();
        match std::env::var("CALCULATRICE_PROFONDEUR_MAX") {
            Ok(v) => match v.trim().parse::<usize>() {
                Ok(p) => base.avec_profondeur(p),
                Err(_) => {
                    log::warn!("CALCULATRICE_PROFONDEUR_MAX ignorée (valeur invalide: {v:?})");
                    base
                }
            },
            Err(_) => base,
        }
    }
}
