// src/cli.rs
use std::{env, error::Error, path::PathBuf};

use crate::config::options::{CatalogInput, CatalogOptions, CleanOptions, SortField};
use crate::progress::Progress;
use crate::runner;

pub fn run() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let Some(cmd) = args.next() else {
        eprintln!(include_str!("cli_help.txt"));
        return Err("Missing command".into());
    };

    match cmd.as_str() {
        "clean" => {
            let opts = parse_clean(args)?;
            let mut p = ConsoleProgress::default();
            let summary = runner::run_clean(&opts, Some(&mut p))?;
            println!("Wrote {}", summary.files_written[0].display());
            Ok(())
        }
        "catalog" => {
            let opts = parse_catalog(args)?;
            let mut p = ConsoleProgress::default();
            let summary = runner::run_catalog(&opts, Some(&mut p))?;
            println!(
                "Wrote {} ({} cards, {} missing photos)",
                summary.files_written[0].display(),
                summary.rows,
                summary.missing
            );
            Ok(())
        }
        "help" | "-h" | "--help" => {
            eprintln!(include_str!("cli_help.txt"));
            Ok(())
        }
        other => Err(format!("Unknown command: {other}").into()),
    }
}

/* ---------------- argument parsing ---------------- */

fn parse_clean(mut args: impl Iterator<Item = String>) -> Result<CleanOptions, Box<dyn Error>> {
    let mut input: Option<PathBuf> = None;
    let mut out: Option<PathBuf> = None;

    while let Some(a) = args.next() {
        match a.as_str() {
            "-i" | "--input" => input = Some(next_path(&mut args, "-i")?),
            "-o" | "--out" => out = Some(next_path(&mut args, "-o")?),
            "-h" | "--help" => {
                eprintln!(include_str!("cli_help.txt"));
                std::process::exit(0);
            }
            _ => return Err(format!("Unknown arg: {}", a).into()),
        }
    }
    let input = input.ok_or("clean requires -i <report.csv>")?;
    Ok(CleanOptions { input, out })
}

fn parse_catalog(mut args: impl Iterator<Item = String>) -> Result<CatalogOptions, Box<dyn Error>> {
    let mut opts = CatalogOptions::default();

    while let Some(a) = args.next() {
        match a.as_str() {
            "-i" | "--input" => opts.input = CatalogInput::Clean(next_path(&mut args, "-i")?),
            "--raw" => opts.input = CatalogInput::Raw(next_path(&mut args, "--raw")?),
            "-o" | "--out" => opts.out = Some(next_path(&mut args, "-o")?),
            "--folder" => opts.folder = next_value(&mut args, "--folder")?,
            "--giac-min" => opts.select.giac_min = next_value(&mut args, "--giac-min")?.parse()?,
            "--perc-min" => opts.select.perc_min = next_value(&mut args, "--perc-min")?.parse()?,
            "--reparto" => opts.select.reparto = Some(next_value(&mut args, "--reparto")?),
            "--categoria" => opts.select.categoria = Some(next_value(&mut args, "--categoria")?),
            "--fornitore" => opts.select.fornitore = Some(next_value(&mut args, "--fornitore")?),
            "--sort" => {
                let v = next_value(&mut args, "--sort")?;
                opts.select.sort = SortField::parse(&v)
                    .ok_or_else(|| format!("Unknown sort field: {}", v))?;
            }
            "--asc" => opts.select.ascending = true,
            "--no-raw" => opts.include_raw = false,
            "--workers" => {
                let n: usize = next_value(&mut args, "--workers")?.parse()?;
                if n == 0 {
                    return Err("--workers must be at least 1".into());
                }
                opts.workers = n;
            }
            "--font" => opts.font = Some(next_path(&mut args, "--font")?),
            "-h" | "--help" => {
                eprintln!(include_str!("cli_help.txt"));
                std::process::exit(0);
            }
            _ => return Err(format!("Unknown arg: {}", a).into()),
        }
    }
    Ok(opts)
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, Box<dyn Error>> {
    args.next().ok_or_else(|| format!("Missing value for {flag}").into())
}

fn next_path(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<PathBuf, Box<dyn Error>> {
    Ok(PathBuf::from(next_value(args, flag)?))
}

/* ---------------- console progress ---------------- */

#[derive(Default)]
struct ConsoleProgress {
    done: usize,
    total: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }
    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }
    fn item_done(&mut self, code: &str) {
        self.done += 1;
        println!("[OK]   {code} ({}/{})", self.done, self.total);
    }
    fn item_missed(&mut self, code: &str, reason: &str) {
        self.done += 1;
        println!("[MISS] {code}: {reason} ({}/{})", self.done, self.total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(s: &str) -> impl Iterator<Item = String> + '_ {
        s.split_whitespace().map(String::from)
    }

    #[test]
    fn clean_requires_input() {
        assert!(parse_clean(argv("")).is_err());
        let opts = parse_clean(argv("-i report.csv -o out/")).unwrap();
        assert_eq!(opts.input, PathBuf::from("report.csv"));
        assert_eq!(opts.out, Some(PathBuf::from("out/")));
    }

    #[test]
    fn catalog_defaults_to_store_cache() {
        let opts = parse_catalog(argv("")).unwrap();
        assert!(matches!(opts.input, CatalogInput::StoreCache));
        assert!(opts.include_raw);
    }

    #[test]
    fn catalog_flags_land_in_options() {
        let opts = parse_catalog(argv(
            "--raw anart.csv --giac-min 50 --perc-min 70.5 --sort tacco --asc --no-raw --workers 2 --fornitore IMMA",
        ))
        .unwrap();
        assert!(matches!(opts.input, CatalogInput::Raw(_)));
        assert_eq!(opts.select.giac_min, 50);
        assert_eq!(opts.select.perc_min, 70.5);
        assert_eq!(opts.select.sort, SortField::TaccoMm);
        assert!(opts.select.ascending);
        assert!(!opts.include_raw);
        assert_eq!(opts.workers, 2);
        assert_eq!(opts.select.fornitore.as_deref(), Some("IMMA"));
    }

    #[test]
    fn unknown_args_are_rejected() {
        assert!(parse_catalog(argv("--frobnicate")).is_err());
        assert!(parse_catalog(argv("--sort sideways")).is_err());
        assert!(parse_catalog(argv("--workers 0")).is_err());
    }
}
