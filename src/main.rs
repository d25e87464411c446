use std::{env, process};
use chrono::Local;
use log::{error, info};
use crate::config::load_config;
use crate::initialization::init;
use crate::logging::setup_logger;

mod brief;
mod config;
mod errors;
mod heat_index;
mod initialization;
mod logging;
mod manager_mail;
mod manager_open_meteo;
mod models;
mod policy;
mod report;
mod storage;

fn main() {
    let config_path = env::args().nth(1).or_else(|| env::var("WX_BRIEF_CONFIG").ok());

    let config = match load_config(config_path.as_deref(), |key| env::var(key).ok()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = setup_logger(&config.general) {
        eprintln!("Logger setup error: {}", e);
        process::exit(1);
    }

    let mgr = match init(&config) {
        Ok(m) => m,
        Err(e) => {
            error!("{}", e);
            eprintln!("Initialization error: {}", e);
            process::exit(1);
        }
    };

    match brief::run(&config, &mgr.open_meteo, &mgr.mail, Local::now().date_naive()) {
        Ok(message) => {
            info!("{}", message);
            println!("{}", message);
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Brief failed: {}", e);
            process::exit(1);
        }
    }
}
