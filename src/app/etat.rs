//! src/app/etat.rs
//!
//! État UI (sans vue).
//!
//! Rôle : contenir l’état de la calculatrice (entrée, drapeau d’erreur, garde-fous)
//! et offrir les actions des boutons sans logique d’affichage.
//!
//! Contrats :
//! - L’évaluation passe uniquement par `noyau::evaluer_avec`.
//! - Actions déterministes ; le seul effet de bord est le journal.
//! - Une erreur n’est jamais une panique : l’entrée devient `Erreur`.

use calculatrice_sure::noyau::jetons::{format_jetons, tokenize};
use calculatrice_sure::noyau::tables::noms_fonctions;
use calculatrice_sure::noyau::{basculer_signe, evaluer_avec, format_resultat, Categorie, Limites};

/// Texte déposé dans l’entrée quand l’évaluation échoue.
pub const TEXTE_ERREUR: &str = "Erreur";

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- entrée utilisateur ---
    pub entree: String,

    // --- sortie ---
    pub erreur: bool, // true si l’entrée affiche `Erreur`

    // --- paramètres ---
    pub limites: Limites,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self::avec_limites(limites_demarrage())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn limites_demarrage() -> Limites {
    Limites::depuis_env()
}

#[cfg(target_arch = "wasm32")]
fn limites_demarrage() -> Limites {
    Limites::default()
}

impl AppCalc {
    pub fn avec_limites(limites: Limites) -> Self {
        Self {
            entree: String::new(),
            erreur: false,
            limites,
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
        }
    }

    /* ------------------------ Actions “boutons” ------------------------ */

    /// C : effacer l’entrée.
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.erreur = false;
        self.focus_entree = true;
    }

    /// ⌫ : retire le dernier caractère.
    pub fn backspace_entree(&mut self) {
        self.entree.pop();
        self.erreur = false;
        self.focus_entree = true;
    }

    /// Chiffres, opérateurs, '.' : ajout tel quel en fin d’entrée.
    pub fn ajouter(&mut self, texte: &str) {
        self.entree.push_str(texte);
        self.erreur = false;
        self.focus_entree = true;
    }

    /// +/- : change le signe du dernier nombre.
    pub fn basculer_signe(&mut self) {
        self.entree = basculer_signe(&self.entree);
        self.focus_entree = true;
    }

    /// = / Enter : évalue l’entrée et la remplace par le résultat (ou `Erreur`).
    ///
    /// Entrée vide (ou seulement des espaces) : rien ne se passe.
    pub fn calculer(&mut self) {
        let texte = self.entree.trim();
        if texte.is_empty() {
            return;
        }

        if log::log_enabled!(log::Level::Debug) {
            if let Ok(jetons) = tokenize(texte) {
                log::debug!("jetons: {}", format_jetons(&jetons));
            }
        }

        match evaluer_avec(texte, &self.limites) {
            Ok(valeur) => {
                let affiche = format_resultat(&valeur);
                log::debug!("{texte:?} = {affiche} ({})", valeur.nom_type());
                self.entree = affiche;
                self.erreur = false;
            }
            Err(e) => {
                match e.categorie() {
                    Categorie::Politique => log::info!("refusé: {texte:?}: {e}"),
                    Categorie::Syntaxe | Categorie::Numerique => {
                        log::debug!("échec: {texte:?}: {e}")
                    }
                }
                if texte.len() > self.limites.longueur_max {
                    log::warn!("entrée de {} octets refusée", texte.len());
                }
                self.entree = TEXTE_ERREUR.to_string();
                self.erreur = true;
            }
        }

        self.focus_entree = true;
    }
}

/// Aide affichée sous le pavé : "Fonctions : sqrt(x), abs(x), round(x, n)".
pub fn aide_fonctions() -> String {
    let signatures: Vec<String> = noms_fonctions()
        .map(|nom| match nom {
            "round" => format!("{nom}(x, n)"),
            _ => format!("{nom}(x)"),
        })
        .collect();
    format!("Fonctions : {}", signatures.join(", "))
}
