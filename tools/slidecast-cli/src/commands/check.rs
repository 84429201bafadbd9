//! Check system capabilities.

use slidecast_media::tools::check_tools;

pub fn run() -> anyhow::Result<()> {
    println!("Slidecast System Check");
    println!("{}", "=".repeat(50));

    let tools = check_tools();
    for tool in &tools {
        if tool.available {
            println!(
                "[OK] {}: {}",
                tool.name,
                tool.version.as_deref().unwrap_or("version unknown")
            );
        } else {
            println!("[MISSING] {}: not found in PATH", tool.name);
        }
    }

    println!();
    if tools.iter().all(|t| t.available) {
        println!("All required tools are available. Slidecast is ready.");
        Ok(())
    } else {
        println!("Some required tools are missing. Install ffmpeg (which ships ffprobe).");
        Err(anyhow::anyhow!("required media tools are missing"))
    }
}
