//! Local OSRM backend for map-matching tests.
//!
//! Downloads a Geofabrik extract once, preprocesses it with the
//! `osrm/osrm-backend` image (MLD pipeline), and serves it from a reusable
//! container.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use testcontainers::core::{IntoContainerPort, Mount};
use testcontainers::runners::SyncRunner;
use testcontainers::{Container, GenericImage, ImageExt, ReuseDirective, TestcontainersError};

const OSRM_IMAGE: &str = "osrm/osrm-backend";

#[derive(Debug)]
pub enum PrepError {
    Io(io::Error),
    Http(reqwest::Error),
    Docker(String),
}

impl From<io::Error> for PrepError {
    fn from(err: io::Error) -> Self {
        PrepError::Io(err)
    }
}

impl From<reqwest::Error> for PrepError {
    fn from(err: reqwest::Error) -> Self {
        PrepError::Http(err)
    }
}

/// A preprocessed extract ready for `osrm-routed`.
#[derive(Debug, Clone)]
pub struct Extract {
    /// Geofabrik path, e.g. "europe/monaco".
    pub region: &'static str,
    pub data_dir: PathBuf,
}

impl Extract {
    fn stem(&self) -> String {
        let name = self.region.rsplit('/').next().unwrap_or("region");
        format!("{}-latest", name)
    }

    fn osrm_file(&self) -> String {
        format!("{}.osrm", self.stem())
    }

    /// Downloads and preprocesses the region if not already on disk.
    pub fn prepare(region: &'static str, data_root: impl AsRef<Path>) -> Result<Self, PrepError> {
        let data_root = data_root.as_ref();
        let data_root = if data_root.is_absolute() {
            data_root.to_path_buf()
        } else {
            std::env::current_dir()?.join(data_root)
        };
        let extract = Self {
            region,
            data_dir: data_root.join(region.replace('/', "-")),
        };
        fs::create_dir_all(&extract.data_dir)?;

        extract.fetch_pbf()?;

        let osrm_base = extract.data_dir.join(extract.osrm_file());
        if !osrm_base.exists() {
            extract.docker(&["osrm-extract", "-p", "/opt/car.lua", &format!("/data/{}.osm.pbf", extract.stem())])?;
        }
        if !osrm_base.with_extension("osrm.partition").exists() {
            extract.docker(&["osrm-partition", &format!("/data/{}", extract.osrm_file())])?;
        }
        if !osrm_base.with_extension("osrm.cells").exists() {
            extract.docker(&["osrm-customize", &format!("/data/{}", extract.osrm_file())])?;
        }

        Ok(extract)
    }

    /// Fetches the Geofabrik extract unless a previous run left it behind.
    /// Writes through a `.part` file so an interrupted fetch is retried.
    fn fetch_pbf(&self) -> Result<(), PrepError> {
        let pbf = self.data_dir.join(format!("{}.osm.pbf", self.stem()));
        if pbf.exists() {
            return Ok(());
        }

        let url = format!("https://download.geofabrik.de/{}-latest.osm.pbf", self.region);
        let body = reqwest::blocking::Client::new()
            .get(&url)
            .send()?
            .error_for_status()?
            .bytes()?;

        let partial = pbf.with_extension("part");
        fs::write(&partial, &body)?;
        fs::rename(&partial, &pbf)?;
        Ok(())
    }

    fn docker(&self, args: &[&str]) -> Result<(), PrepError> {
        let status = Command::new("docker")
            .args(["run", "--rm", "-t", "-v"])
            .arg(format!("{}:/data", self.data_dir.display()))
            .arg(OSRM_IMAGE)
            .args(args)
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(PrepError::Docker(format!("{} exited with {}", args[0], status)))
        }
    }

    /// Starts `osrm-routed` on the extract. Returns the container and its base URL.
    pub fn serve(&self) -> Result<(Container<GenericImage>, String), TestcontainersError> {
        let image = GenericImage::new(OSRM_IMAGE, "latest")
            .with_exposed_port(5000.tcp())
            .with_mount(Mount::bind_mount(
                self.data_dir.to_string_lossy().to_string(),
                "/data",
            ))
            .with_cmd(vec![
                "osrm-routed".to_string(),
                "--algorithm".to_string(),
                "mld".to_string(),
                format!("/data/{}", self.osrm_file()),
            ])
            .with_container_name(format!("osrm-{}-match", self.stem()))
            .with_startup_timeout(std::time::Duration::from_secs(30))
            .with_reuse(ReuseDirective::Always);

        let container = image.start()?;
        let port = container.get_host_port_ipv4(5000.tcp())?;
        Ok((container, format!("http://127.0.0.1:{}", port)))
    }
}
