// src/noyau/syntaxe.rs
//
// Jetons -> Expr : descente récursive, montée de priorités pour tous les opérateurs infixes.
//
// Priorités (de la plus faible à la plus forte) :
//   tuple  ,
//   or / and / not
//   comparaisons  < <= > >= == !=
//   |  ^  &  << >>
//   + -
//   * / // % @
//   unaires + - ~
//   **            (associatif à droite, lie plus fort qu'un unaire à sa gauche : -2**2 = -4)
//   appels f(..), attributs a.b, indices a[i]
//
// Les chaînes binaires (1+2+3...) sont repliées en boucle, pas en récursion.
// Seules les imbrications (parenthèses, unaires, **, not) consomment de la profondeur.
// Une parenthèse coûte cinq appels : expression_tuple, binaire, facteur, primaire, atome.

use super::erreur::ErreurEval;
use super::expr::{Expr, Litteral, OpBinaire, OpComparaison, OpLogique, OpUnaire};
use super::jetons::{Jeton, Tok};

/// Mots réservés qui ne peuvent pas servir de nom.
const MOTS_CLES: [&str; 22] = [
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "for", "from", "if", "import", "in", "is", "lambda", "not", "or",
];

/// Priorité du `not` préfixe : entre `and` et les comparaisons.
const PRIORITE_NOT: u8 = 2;

#[derive(Clone, Copy, Debug)]
enum Infixe {
    Logique(OpLogique),
    Comparaison(OpComparaison),
    Binaire(OpBinaire),
}

impl Infixe {
    fn noeud(self, gauche: Expr, droite: Expr) -> Expr {
        match self {
            Infixe::Binaire(op) => Expr::binaire(op, gauche, droite),
            Infixe::Comparaison(op) => Expr::Comparaison {
                op,
                gauche: Box::new(gauche),
                droite: Box::new(droite),
            },
            Infixe::Logique(op) => Expr::Logique {
                op,
                gauche: Box::new(gauche),
                droite: Box::new(droite),
            },
        }
    }
}

/// `or` < `and` < (`not`) < comparaisons < `|` < `^` < `&` < `<< >>` < `+ -` < `* / // % @`
fn priorite_infixe(t: &Tok) -> Option<(Infixe, u8)> {
    use Infixe::{Binaire, Comparaison, Logique};
    Some(match t {
        Tok::Ident(n) if n == "or" => (Logique(OpLogique::Ou), 0),
        Tok::Ident(n) if n == "and" => (Logique(OpLogique::Et), 1),
        Tok::EgalEgal => (Comparaison(OpComparaison::Egal), 3),
        Tok::Different => (Comparaison(OpComparaison::Different), 3),
        Tok::Inferieur => (Comparaison(OpComparaison::Inferieur), 3),
        Tok::InferieurEgal => (Comparaison(OpComparaison::InferieurEgal), 3),
        Tok::Superieur => (Comparaison(OpComparaison::Superieur), 3),
        Tok::SuperieurEgal => (Comparaison(OpComparaison::SuperieurEgal), 3),
        Tok::Barre => (Binaire(OpBinaire::OuBit), 4),
        Tok::Chapeau => (Binaire(OpBinaire::OuExclBit), 5),
        Tok::Esperluette => (Binaire(OpBinaire::EtBit), 6),
        Tok::DecalGauche => (Binaire(OpBinaire::DecalGauche), 7),
        Tok::DecalDroite => (Binaire(OpBinaire::DecalDroite), 7),
        Tok::Plus => (Binaire(OpBinaire::Add), 8),
        Tok::Moins => (Binaire(OpBinaire::Sub), 8),
        Tok::Etoile => (Binaire(OpBinaire::Mul), 9),
        Tok::Slash => (Binaire(OpBinaire::Div), 9),
        Tok::DoubleSlash => (Binaire(OpBinaire::DivEntiere), 9),
        Tok::Pourcent => (Binaire(OpBinaire::Mod), 9),
        Tok::Arobase => (Binaire(OpBinaire::MatMul), 9),
        _ => return None,
    })
}

struct Analyseur<'a> {
    jetons: &'a [Jeton],
    pos: usize,
    profondeur: usize,
    profondeur_max: usize,
    fin_texte: usize,
}

/// Construit l'arbre d'une expression complète.
/// `fin_texte` = longueur du texte source (position des erreurs “fin inattendue”).
pub fn parse(
    jetons: &[Jeton],
    fin_texte: usize,
    profondeur_max: usize,
) -> Result<Expr, ErreurEval> {
    let mut a = Analyseur {
        jetons,
        pos: 0,
        profondeur: 0,
        profondeur_max,
        fin_texte,
    };

    let e = a.expression_tuple()?;
    if let Some(j) = a.jetons.get(a.pos) {
        return Err(ErreurEval::syntaxe(
            format!("jeton inattendu '{}'", j.tok),
            j.debut,
        ));
    }
    Ok(e)
}

impl<'a> Analyseur<'a> {
    /* ------------------------ Outils ------------------------ */

    fn courant(&self) -> Option<&'a Tok> {
        self.jetons.get(self.pos).map(|j| &j.tok)
    }

    fn position(&self) -> usize {
        self.jetons
            .get(self.pos)
            .map(|j| j.debut)
            .unwrap_or(self.fin_texte)
    }

    fn avance(&mut self) -> Option<&'a Jeton> {
        let j = self.jetons.get(self.pos);
        if j.is_some() {
            self.pos += 1;
        }
        j
    }

    fn accepte(&mut self, tok: &Tok) -> bool {
        if self.courant() == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn accepte_mot(&mut self, mot: &str) -> bool {
        if matches!(self.courant(), Some(Tok::Ident(n)) if n == mot) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn attend(&mut self, tok: &Tok) -> Result<(), ErreurEval> {
        if self.accepte(tok) {
            return Ok(());
        }
        Err(self.inattendu(&format!("'{tok}' attendu")))
    }

    fn inattendu(&self, attendu: &str) -> ErreurEval {
        match self.jetons.get(self.pos) {
            Some(j) => ErreurEval::syntaxe(format!("{attendu}, trouvé '{}'", j.tok), j.debut),
            None => ErreurEval::syntaxe(
                format!("{attendu}, fin d'expression inattendue"),
                self.fin_texte,
            ),
        }
    }

    /// Garde-fou d'imbrication (anti-pile).
    fn entrer(&mut self) -> Result<(), ErreurEval> {
        self.profondeur += 1;
        if self.profondeur > self.profondeur_max {
            return Err(ErreurEval::syntaxe(
                format!("expression trop imbriquée (> {})", self.profondeur_max),
                self.position(),
            ));
        }
        Ok(())
    }

    fn sortir(&mut self) {
        self.profondeur -= 1;
    }

    /// Une expression commence-t-elle ici ? (pour `(2,)` et `f(1,)`).
    fn debut_expression(&self) -> bool {
        match self.courant() {
            None => false,
            Some(Tok::Ident(n)) => n == "not" || !MOTS_CLES.contains(&n.as_str()),
            Some(t) => {
                t.est_nombre()
                    || matches!(
                        t,
                        Tok::Chaine(_)
                            | Tok::LPar
                            | Tok::LCroch
                            | Tok::Plus
                            | Tok::Moins
                            | Tok::Tilde
                    )
            }
        }
    }

    /* ------------------------ Niveaux ------------------------ */

    /// expr (',' expr)* [','] : un tuple dès qu'une virgule apparaît.
    fn expression_tuple(&mut self) -> Result<Expr, ErreurEval> {
        let premier = self.binaire(0)?;
        if self.courant() != Some(&Tok::Virgule) {
            return Ok(premier);
        }

        let mut items = vec![premier];
        while self.accepte(&Tok::Virgule) {
            if !self.debut_expression() {
                break;
            }
            items.push(self.binaire(0)?);
        }
        Ok(Expr::Tuple(items))
    }

    /// Opérateurs infixes par priorité croissante, repliés à gauche :
    /// `or`, `and`, comparaisons, puis les opérateurs binaires.
    /// Une boucle par niveau : 1+1+...+1 ne descend pas d'un cran par terme,
    /// et `not` est lu ici pour ne pas ajouter d'étage par parenthèse.
    fn binaire(&mut self, priorite_min: u8) -> Result<Expr, ErreurEval> {
        let mut g = if priorite_min <= PRIORITE_NOT && self.accepte_mot("not") {
            self.entrer()?;
            let x = self.binaire(PRIORITE_NOT)?;
            self.sortir();
            Expr::unaire(OpUnaire::Non, x)
        } else {
            self.facteur()?
        };

        while let Some((op, p)) = self.courant().and_then(priorite_infixe) {
            if p < priorite_min {
                break;
            }
            self.pos += 1;
            let d = self.binaire(p + 1)?;
            g = op.noeud(g, d);
        }
        Ok(g)
    }

    /// ('+' | '-' | '~') facteur | primaire ['**' facteur]
    fn facteur(&mut self) -> Result<Expr, ErreurEval> {
        self.entrer()?;
        let op = match self.courant() {
            Some(Tok::Plus) => Some(OpUnaire::Pos),
            Some(Tok::Moins) => Some(OpUnaire::Neg),
            Some(Tok::Tilde) => Some(OpUnaire::Inversion),
            _ => None,
        };
        let e = match op {
            Some(op) => {
                self.pos += 1;
                let x = self.facteur()?;
                Expr::unaire(op, x)
            }
            None => {
                let base = self.primaire()?;
                if self.accepte(&Tok::DoubleEtoile) {
                    let exposant = self.facteur()?;
                    Expr::binaire(OpBinaire::Pow, base, exposant)
                } else {
                    base
                }
            }
        };
        self.sortir();
        Ok(e)
    }

    /// atome suivi d'appels / attributs / indices.
    fn primaire(&mut self) -> Result<Expr, ErreurEval> {
        let mut e = self.atome()?;
        loop {
            if self.accepte(&Tok::LPar) {
                let (args, nommes) = self.arguments()?;
                e = Expr::Appel {
                    appele: Box::new(e),
                    args,
                    nommes,
                };
            } else if self.accepte(&Tok::Point) {
                let nom = match self.courant() {
                    Some(Tok::Ident(n)) if !MOTS_CLES.contains(&n.as_str()) => n.clone(),
                    _ => return Err(self.inattendu("nom d'attribut attendu après '.'")),
                };
                self.pos += 1;
                e = Expr::Attribut {
                    objet: Box::new(e),
                    nom,
                };
            } else if self.accepte(&Tok::LCroch) {
                let indice = self.expression_tuple()?;
                self.attend(&Tok::RCroch)?;
                e = Expr::Indice {
                    objet: Box::new(e),
                    indice: Box::new(indice),
                };
            } else {
                return Ok(e);
            }
        }
    }

    /// Arguments d'appel, '(' déjà consommée.
    /// Positionnels d'abord, puis nommés (`nom=valeur`).
    fn arguments(&mut self) -> Result<(Vec<Expr>, Vec<String>), ErreurEval> {
        let mut args = Vec::new();
        let mut nommes = Vec::new();

        while !self.accepte(&Tok::RPar) {
            let est_nomme = matches!(
                (self.courant(), self.jetons.get(self.pos + 1).map(|j| &j.tok)),
                (Some(Tok::Ident(_)), Some(Tok::Egal))
            );

            if est_nomme {
                if let Some(Tok::Ident(n)) = self.courant() {
                    nommes.push(n.clone());
                }
                self.pos += 2;
                args.push(self.binaire(0)?);
            } else {
                if !nommes.is_empty() {
                    return Err(ErreurEval::syntaxe(
                        "argument positionnel après un argument nommé",
                        self.position(),
                    ));
                }
                args.push(self.binaire(0)?);
            }

            if !self.accepte(&Tok::Virgule) {
                self.attend(&Tok::RPar)?;
                break;
            }
        }

        // les valeurs nommées ne sont pas des positionnels
        let positionnels = args.len() - nommes.len();
        args.truncate(positionnels);
        Ok((args, nommes))
    }

    fn atome(&mut self) -> Result<Expr, ErreurEval> {
        let Some(j) = self.avance() else {
            return Err(self.inattendu("expression attendue"));
        };

        let e = match &j.tok {
            Tok::Entier(n) => Expr::Litteral(Litteral::Entier(n.clone())),
            Tok::Flottant(x) => Expr::Litteral(Litteral::Flottant(*x)),
            Tok::Imaginaire(x) => Expr::Litteral(Litteral::Complexe(*x)),

            Tok::Chaine(s) => {
                // 'a' 'b' => 'ab'
                let mut s = s.clone();
                while let Some(Tok::Chaine(suite)) = self.courant() {
                    s.push_str(suite);
                    self.pos += 1;
                }
                Expr::Litteral(Litteral::Chaine(s))
            }

            Tok::Ident(n) => match n.as_str() {
                "True" => Expr::Litteral(Litteral::Booleen(true)),
                "False" => Expr::Litteral(Litteral::Booleen(false)),
                "None" => Expr::Litteral(Litteral::Rien),
                mot if MOTS_CLES.contains(&mot) => {
                    return Err(ErreurEval::syntaxe(
                        format!("mot-clé inattendu '{mot}'"),
                        j.debut,
                    ))
                }
                _ => Expr::Nom(n.clone()),
            },

            Tok::LPar => {
                if self.accepte(&Tok::RPar) {
                    Expr::Tuple(Vec::new())
                } else {
                    let e = self.expression_tuple()?;
                    self.attend(&Tok::RPar)?;
                    e
                }
            }

            Tok::LCroch => {
                let mut items = Vec::new();
                while !self.accepte(&Tok::RCroch) {
                    items.push(self.binaire(0)?);
                    if !self.accepte(&Tok::Virgule) {
                        self.attend(&Tok::RCroch)?;
                        break;
                    }
                }
                Expr::Liste(items)
            }

            autre => {
                return Err(ErreurEval::syntaxe(
                    format!("jeton inattendu '{autre}'"),
                    j.debut,
                ))
            }
        };
        Ok(e)
    }
}
