// src/app/vue.rs
//
// Vue (UI egui) — natif + web
// ---------------------------
// Objectifs :
// - Même AppCalc (etat.rs) pour natif + wasm
// - Clavier : Enter évalue (quand le champ est focus), Backspace laissé au TextEdit
// - Tactile : gros boutons, focus redonné après clic (focus_entree)
//
// Note :
// - PAS de Key::NumEnter (n’existe pas dans egui 0.33.x)

use eframe::egui;

use super::etat::{aide_fonctions, AppCalc};

/// Pavé 4 colonnes, ligne par ligne.
const PAVE: [[Touche; 4]; 5] = [
    [
        Touche::Action("C", Action::Effacer),
        Touche::Action("⌫", Action::RetourArriere),
        Touche::Texte("%"),
        Touche::Texte("/"),
    ],
    [
        Touche::Texte("7"),
        Touche::Texte("8"),
        Touche::Texte("9"),
        Touche::Texte("*"),
    ],
    [
        Touche::Texte("4"),
        Touche::Texte("5"),
        Touche::Texte("6"),
        Touche::Texte("-"),
    ],
    [
        Touche::Texte("1"),
        Touche::Texte("2"),
        Touche::Texte("3"),
        Touche::Texte("+"),
    ],
    [
        Touche::Action("+/-", Action::Signe),
        Touche::Texte("0"),
        Touche::Texte("."),
        Touche::Action("=", Action::Calculer),
    ],
];

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Densité “calc”
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        ui.heading(crate::TITRE_APP);
        ui.add_space(6.0);

        self.ui_entree(ui);

        ui.add_space(8.0);

        self.ui_pave(ui);

        ui.add_space(8.0);
        ui.separator();
        ui.label(aide_fonctions());
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        let mut texte = egui::TextEdit::singleline(&mut self.entree)
            .desired_width(ui.available_width())
            .hint_text("Ex: (2+3)*4, sqrt(2)/2, round(2.675, 2)")
            .id_source("entree_edit")
            .code_editor();
        if self.erreur {
            texte = texte.text_color(ui.visuals().error_fg_color);
        }

        // IMPORTANT : id stable + focus contrôlé
        let resp = ui.add(texte);

        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        // Enter : une ligne simple perd le focus en validant, d’où lost_focus().
        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (resp.has_focus() || resp.lost_focus()) && enter {
            self.calculer();
        }
    }

    fn ui_pave(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_calculatrice")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for ligne in PAVE {
                    for touche in ligne {
                        self.bouton(ui, touche);
                    }
                    ui.end_row();
                }
            });
    }

    fn bouton(&mut self, ui: &mut egui::Ui, touche: Touche) {
        let label = touche.label();
        let resp = ui.add_sized([64.0, 40.0], egui::Button::new(label));
        if !resp.clicked() {
            return;
        }

        match touche {
            Touche::Texte(t) => self.ajouter(t),
            Touche::Action(_, Action::Effacer) => self.clear_entree(),
            Touche::Action(_, Action::RetourArriere) => self.backspace_entree(),
            Touche::Action(_, Action::Signe) => self.basculer_signe(),
            Touche::Action(_, Action::Calculer) => self.calculer(),
        }
        self.focus_entree = true;
    }
}

#[derive(Clone, Copy, Debug)]
enum Action {
    Effacer,
    RetourArriere,
    Signe,
    Calculer,
}

#[derive(Clone, Copy, Debug)]
enum Touche {
    /// Ajoutée telle quelle à l’entrée.
    Texte(&'static str),
    Action(&'static str, Action),
}

impl Touche {
    fn label(self) -> &'static str {
        match self {
            Touche::Texte(t) | Touche::Action(t, _) => t,
        }
    }
}
