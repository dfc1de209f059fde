mod braille;
mod cantonese;
mod gr;
mod ipa;
mod pinyin;
mod wade_giles;
