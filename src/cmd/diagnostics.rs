//! Diagnostics command — displays system and Podman runtime information.

use anyhow::Result;
use sysinfo::System;

use hive_daemon::runtime::PodmanRunner;

pub async fn run() -> Result<()> {
    println!("Project H.I.V.E Daemon Diagnostics");
    println!("===================================\n");

    println!("System Information:");
    println!("-------------------");

    let mut sys = System::new_all();
    sys.refresh_all();

    println!("  OS: {} {}", System::name().unwrap_or_default(), System::os_version().unwrap_or_default());
    println!("  Kernel: {}", System::kernel_version().unwrap_or_default());
    println!("  Hostname: {}", System::host_name().unwrap_or_default());
    println!("  CPUs: {}", sys.cpus().len());
    println!("  Recommended runtime-call concurrency: {}", num_cpus::get() * 4);
    println!("  Total Memory: {} MB", sys.total_memory() / 1024 / 1024);
    println!("  Used Memory: {} MB", sys.used_memory() / 1024 / 1024);
    println!("  Uptime: {} seconds", System::uptime());

    println!("\nPodman Runtime:");
    println!("---------------");

    let runner = PodmanRunner::new("podman", 10);
    match runner.run(&["version", "--format", "{{.Client.Version}}"]).await {
        Ok(version) => println!("  Version: {version}"),
        Err(e) => println!("  Error querying podman: {e}"),
    }
    match runner.run(&["info", "--format", "{{.Store.GraphDriverName}}"]).await {
        Ok(driver) => println!("  Storage driver: {driver}"),
        Err(e) => println!("  Error querying podman info: {e}"),
    }

    println!("\nNetwork Interfaces:");
    println!("-------------------");

    let networks = sysinfo::Networks::new_with_refreshed_list();
    for (name, _data) in &networks {
        println!("  {name}");
    }

    println!("\nDiagnostics complete.");
    Ok(())
}
