// src/lib.rs
//
// Calculatrice sûre — bibliothèque
// --------------------------------
// Le noyau (évaluateur restreint) est une bibliothèque : l'interface egui
// (src/main.rs + src/app) n'en est qu'un client parmi d'autres.

pub mod noyau;
