// src/noyau/jetons.rs
//
// Découpage du texte en jetons (avec positions en octets).
// Les positions servent aux messages d'erreur et au bouton +/- (qui réécrit
// l'entrée jeton par jeton, jamais par découpage de caractères “à l'aveugle”).

use num_bigint::BigInt;

use std::fmt;

use super::erreur::ErreurEval;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Entier(BigInt),
    Flottant(f64),
    Imaginaire(f64),
    Chaine(String),
    Ident(String),

    Plus,
    Moins,
    Etoile,
    DoubleEtoile,
    Slash,
    DoubleSlash,
    Pourcent,
    Arobase,
    Esperluette,
    Barre,
    Chapeau,
    Tilde,
    DecalGauche,
    DecalDroite,

    Inferieur,
    InferieurEgal,
    Superieur,
    SuperieurEgal,
    EgalEgal,
    Different,
    Egal,

    LPar,
    RPar,
    LCroch,
    RCroch,
    Virgule,
    Point,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Jeton {
    pub tok: Tok,
    /// Début (octet, inclus).
    pub debut: usize,
    /// Fin (octet, exclue).
    pub fin: usize,
}

impl Tok {
    pub fn est_nombre(&self) -> bool {
        matches!(self, Tok::Entier(_) | Tok::Flottant(_) | Tok::Imaginaire(_))
    }
}

/// Opérateurs de 2 caractères, testés avant ceux d'un caractère.
static OPERATEURS_DOUBLES: [(&str, Tok); 8] = [
    ("**", Tok::DoubleEtoile),
    ("//", Tok::DoubleSlash),
    ("<<", Tok::DecalGauche),
    (">>", Tok::DecalDroite),
    ("<=", Tok::InferieurEgal),
    (">=", Tok::SuperieurEgal),
    ("==", Tok::EgalEgal),
    ("!=", Tok::Different),
];

fn operateur_simple(c: char) -> Option<Tok> {
    Some(match c {
        '+' => Tok::Plus,
        '-' => Tok::Moins,
        '*' => Tok::Etoile,
        '/' => Tok::Slash,
        '%' => Tok::Pourcent,
        '@' => Tok::Arobase,
        '&' => Tok::Esperluette,
        '|' => Tok::Barre,
        '^' => Tok::Chapeau,
        '~' => Tok::Tilde,
        '<' => Tok::Inferieur,
        '>' => Tok::Superieur,
        '=' => Tok::Egal,
        '(' => Tok::LPar,
        ')' => Tok::RPar,
        '[' => Tok::LCroch,
        ']' => Tok::RCroch,
        ',' => Tok::Virgule,
        _ => return None,
    })
}

struct Lecteur<'a> {
    texte: &'a str,
    chars: Vec<(usize, char)>,
    i: usize,
}

impl<'a> Lecteur<'a> {
    fn new(texte: &'a str) -> Self {
        Self {
            texte,
            chars: texte.char_indices().collect(),
            i: 0,
        }
    }

    fn courant(&self) -> Option<char> {
        self.chars.get(self.i).map(|&(_, c)| c)
    }

    fn suivant(&self, k: usize) -> Option<char> {
        self.chars.get(self.i + k).map(|&(_, c)| c)
    }

    /// Position (octet) du caractère d'indice `i`, ou fin du texte.
    fn octet(&self, i: usize) -> usize {
        self.chars.get(i).map(|&(o, _)| o).unwrap_or(self.texte.len())
    }

    fn reste(&self) -> &'a str {
        &self.texte[self.octet(self.i)..]
    }

    /// Chiffres d'une base, `_` permis seulement entre deux chiffres.
    fn lire_chiffres(&mut self, base: u32, out: &mut String) -> Result<(), ErreurEval> {
        while let Some(c) = self.courant() {
            if c.is_digit(base) {
                out.push(c);
                self.i += 1;
            } else if c == '_'
                && !out.is_empty()
                && self.suivant(1).is_some_and(|d| d.is_digit(base))
            {
                self.i += 1;
            } else {
                break;
            }
        }
        if self.courant() == Some('_') {
            return Err(ErreurEval::syntaxe(
                "littéral numérique invalide ('_' mal placé)",
                self.octet(self.i),
            ));
        }
        Ok(())
    }

    fn lire_nombre(&mut self) -> Result<Tok, ErreurEval> {
        let debut = self.octet(self.i);

        // 0x.. / 0o.. / 0b..
        if self.courant() == Some('0') {
            let base = match self.suivant(1) {
                Some('x' | 'X') => Some(16),
                Some('o' | 'O') => Some(8),
                Some('b' | 'B') => Some(2),
                _ => None,
            };
            if let Some(base) = base {
                self.i += 2;
                if self.courant() == Some('_') {
                    self.i += 1;
                }
                let mut chiffres = String::new();
                self.lire_chiffres(base, &mut chiffres)?;
                if chiffres.is_empty() {
                    return Err(ErreurEval::syntaxe("littéral entier incomplet", debut));
                }
                let n = BigInt::parse_bytes(chiffres.as_bytes(), base)
                    .ok_or_else(|| ErreurEval::syntaxe("nombre invalide", debut))?;
                return Ok(Tok::Entier(n));
            }
        }

        let mut entier = String::new();
        self.lire_chiffres(10, &mut entier)?;

        let mut flottant = false;
        let mut texte = entier.clone();

        // partie décimale
        if self.courant() == Some('.') {
            flottant = true;
            self.i += 1;
            texte.push('.');
            let mut frac = String::new();
            if self.courant().is_some_and(|c| c.is_ascii_digit()) {
                self.lire_chiffres(10, &mut frac)?;
            }
            if entier.is_empty() && frac.is_empty() {
                return Err(ErreurEval::syntaxe("nombre invalide", debut));
            }
            texte.push_str(&frac);
        }

        // exposant
        if matches!(self.courant(), Some('e' | 'E')) {
            let signe = matches!(self.suivant(1), Some('+' | '-'));
            let apres = if signe { self.suivant(2) } else { self.suivant(1) };
            if apres.is_some_and(|c| c.is_ascii_digit()) {
                flottant = true;
                texte.push('e');
                self.i += 1;
                if signe {
                    texte.push(self.courant().unwrap_or('+'));
                    self.i += 1;
                }
                let mut exp = String::new();
                self.lire_chiffres(10, &mut exp)?;
                texte.push_str(&exp);
            } else {
                return Err(ErreurEval::syntaxe("exposant incomplet", self.octet(self.i)));
            }
        }

        // imaginaire
        if matches!(self.courant(), Some('j' | 'J')) {
            self.i += 1;
            let x = texte
                .parse::<f64>()
                .map_err(|_| ErreurEval::syntaxe("nombre invalide", debut))?;
            return Ok(Tok::Imaginaire(x));
        }

        if flottant {
            let x = texte
                .parse::<f64>()
                .map_err(|_| ErreurEval::syntaxe("nombre invalide", debut))?;
            return Ok(Tok::Flottant(x));
        }

        // 007 : zéros de tête interdits (sauf 0, 00, ...)
        if entier.len() > 1 && entier.starts_with('0') && entier.bytes().any(|b| b != b'0') {
            return Err(ErreurEval::syntaxe(
                "zéros de tête interdits dans un entier décimal",
                debut,
            ));
        }

        let n = BigInt::parse_bytes(entier.as_bytes(), 10)
            .ok_or_else(|| ErreurEval::syntaxe("nombre invalide", debut))?;
        Ok(Tok::Entier(n))
    }

    fn lire_chaine(&mut self, quote: char) -> Result<Tok, ErreurEval> {
        let debut = self.octet(self.i);
        self.i += 1;
        let mut out = String::new();
        while let Some(c) = self.courant() {
            self.i += 1;
            match c {
                '\\' => {
                    if let Some(d) = self.courant() {
                        out.push(d);
                        self.i += 1;
                    }
                }
                c if c == quote => return Ok(Tok::Chaine(out)),
                c => out.push(c),
            }
        }
        Err(ErreurEval::syntaxe("chaîne non terminée", debut))
    }
}

/// Découpe `s` en jetons.
/// Supporte:
/// - entiers (12, 1_000, 0x1F, 0o17, 0b101), flottants (1.5, .5, 2., 1e-3), imaginaires (2j)
/// - chaînes '...' ou "..." (lues pour être refusées plus tard)
/// - opérateurs + - * ** / // % @ & | ^ ~ << >> et comparaisons
/// - ( ) [ ] , . =
/// - identifiants (sensibles à la casse)
pub fn tokenize(s: &str) -> Result<Vec<Jeton>, ErreurEval> {
    let mut out = Vec::new();
    let mut lx = Lecteur::new(s);

    while let Some(c) = lx.courant() {
        if c.is_whitespace() {
            lx.i += 1;
            continue;
        }

        let debut_i = lx.i;
        let debut = lx.octet(debut_i);

        // Nombres (y compris .5)
        if c.is_ascii_digit() || (c == '.' && lx.suivant(1).is_some_and(|d| d.is_ascii_digit()))
        {
            let tok = lx.lire_nombre()?;
            out.push(Jeton {
                tok,
                debut,
                fin: lx.octet(lx.i),
            });
            continue;
        }

        if c == '.' {
            lx.i += 1;
            out.push(Jeton {
                tok: Tok::Point,
                debut,
                fin: lx.octet(lx.i),
            });
            continue;
        }

        // Chaînes
        if c == '\'' || c == '"' {
            let tok = lx.lire_chaine(c)?;
            out.push(Jeton {
                tok,
                debut,
                fin: lx.octet(lx.i),
            });
            continue;
        }

        // Identifiants
        if c.is_alphabetic() || c == '_' {
            lx.i += 1;
            while lx.courant().is_some_and(|d| d.is_alphanumeric() || d == '_') {
                lx.i += 1;
            }
            let fin = lx.octet(lx.i);
            out.push(Jeton {
                tok: Tok::Ident(s[debut..fin].to_string()),
                debut,
                fin,
            });
            continue;
        }

        // Opérateurs doubles puis simples
        if let Some((txt, tok)) = OPERATEURS_DOUBLES
            .iter()
            .find(|(txt, _)| lx.reste().starts_with(*txt))
        {
            lx.i += txt.chars().count();
            out.push(Jeton {
                tok: tok.clone(),
                debut,
                fin: lx.octet(lx.i),
            });
            continue;
        }
        if let Some(tok) = operateur_simple(c) {
            lx.i += 1;
            out.push(Jeton {
                tok,
                debut,
                fin: lx.octet(lx.i),
            });
            continue;
        }

        return Err(ErreurEval::syntaxe(
            format!("caractère inattendu: '{c}'"),
            debut,
        ));
    }

    Ok(out)
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tok::Entier(n) => return write!(f, "{n}"),
            Tok::Flottant(x) => return write!(f, "{x:?}"),
            Tok::Imaginaire(x) => return write!(f, "{x:?}j"),
            Tok::Chaine(s) => return write!(f, "{s:?}"),
            Tok::Ident(name) => return write!(f, "{name}"),

            Tok::Plus => "+",
            Tok::Moins => "-",
            Tok::Etoile => "*",
            Tok::DoubleEtoile => "**",
            Tok::Slash => "/",
            Tok::DoubleSlash => "//",
            Tok::Pourcent => "%",
            Tok::Arobase => "@",
            Tok::Esperluette => "&",
            Tok::Barre => "|",
            Tok::Chapeau => "^",
            Tok::Tilde => "~",
            Tok::DecalGauche => "<<",
            Tok::DecalDroite => ">>",
            Tok::Inferieur => "<",
            Tok::InferieurEgal => "<=",
            Tok::Superieur => ">",
            Tok::SuperieurEgal => ">=",
            Tok::EgalEgal => "==",
            Tok::Different => "!=",
            Tok::Egal => "=",
            Tok::LPar => "(",
            Tok::RPar => ")",
            Tok::LCroch => "[",
            Tok::RCroch => "]",
            Tok::Virgule => ",",
            Tok::Point => ".",
        };
        f.write_str(s)
    }
}

/// Format utilitaire (journal) : liste de jetons en texte.
pub fn format_jetons(jetons: &[Jeton]) -> String {
    jetons
        .iter()
        .map(|j| j.tok.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
