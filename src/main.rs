use std::io;

use anyhow::Result;
use console::style;

use character_forge::config::{AiMode, AppConfig};
use character_forge::core::character_gen::{CharacterForge, TemplateStore};
use character_forge::menu::{choose_generator, Menu};

fn main() -> Result<()> {
    // Initialize logging
    let _log_guard = character_forge::core::logging::init();
    log::info!("{} v{} starting", character_forge::NAME, character_forge::VERSION);

    let config = AppConfig::load();

    println!("{}", style("Welcome to Character Forge!").bold().yellow());

    let templates = match &config.templates.path {
        Some(path) => TemplateStore::load(path).unwrap_or_else(|e| {
            log::warn!("{e}; using built-in templates");
            println!("Could not load templates ({e}). Using built-in templates.");
            TemplateStore::builtin()
        }),
        None => TemplateStore::builtin(),
    };

    let available = match config.generator.mode {
        AiMode::Never => false,
        _ => {
            println!(
                "Checking for {} to enhance biographies...",
                config.generator.program
            );
            config.generator.build_generator().is_available()
        }
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let mut forge = CharacterForge::new()
        .with_templates(templates)
        .with_roll_method(config.forge.roll_method);
    if let Some(generator) = choose_generator(&config.generator, available, &mut input, &mut output)? {
        log::info!("Biographies will use {}", generator.model());
        forge = forge.with_generator(Box::new(generator));
    }

    let mut menu = Menu::new(forge, config.output_dir(), input, output);
    menu.run()?;

    log::info!("{} exiting", character_forge::NAME);
    Ok(())
}
