//! Offline postal code lookup
//!
//! Uses the GeoNames postal code dumps (one tab separated file per
//! country). A country's file is downloaded once, extracted from its zip
//! archive and cached; later lookups read the cache only.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::GeocodeSettings;
use crate::error::GeocodeError;

const COLUMNS: usize = 12;
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// One postal code with its administrative names and coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PostalLocation {
    pub country_code: String,
    pub postal_code: String,
    pub place_name: String,
    pub state_name: String,
    pub state_code: String,
    pub county_name: String,
    pub county_code: String,
    pub community_name: String,
    pub community_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<u8>,
}

impl PostalLocation {
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Postal codes of a single country, keyed by normalised code.
#[derive(Debug, Default)]
pub struct PostalIndex {
    country: String,
    entries: HashMap<String, PostalLocation>,
}

impl PostalIndex {
    /// Parse a GeoNames dump. Places sharing a code are merged: the first
    /// record's fields win, every place name is joined and coordinates are
    /// averaged.
    pub fn parse<R: BufRead>(country: &str, reader: R) -> Result<Self, GeocodeError> {
        let country = country.to_ascii_uppercase();
        let mut merged: HashMap<String, (PostalLocation, Vec<String>, usize)> = HashMap::new();

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|e| GeocodeError::Malformed {
                line: line_no,
                reason: e.to_string(),
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let record = parse_record(&line).map_err(|reason| GeocodeError::Malformed {
                line: line_no,
                reason,
            })?;
            let key = normalize_postal_code(&country, &record.postal_code);

            match merged.entry(key) {
                Entry::Occupied(mut slot) => {
                    let (first, places, count) = slot.get_mut();
                    places.push(record.place_name);
                    first.latitude += record.latitude;
                    first.longitude += record.longitude;
                    *count += 1;
                }
                Entry::Vacant(slot) => {
                    let places = vec![record.place_name.clone()];
                    slot.insert((record, places, 1));
                }
            }
        }

        let entries = merged
            .into_iter()
            .map(|(key, (mut loc, places, count))| {
                loc.place_name = places.join(", ");
                loc.latitude /= count as f64;
                loc.longitude /= count as f64;
                (key, loc)
            })
            .collect::<HashMap<_, _>>();
        debug!(country = %country, codes = entries.len(), "postal index loaded");

        Ok(Self { country, entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn query_postal_code(&self, code: &str) -> Option<&PostalLocation> {
        self.entries
            .get(&normalize_postal_code(&self.country, code))
    }
}

fn parse_record(line: &str) -> Result<PostalLocation, String> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < COLUMNS - 1 {
        return Err(format!("expected {COLUMNS} columns, found {}", fields.len()));
    }
    let coord = |i: usize, name: &str| {
        fields[i]
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid {name} '{}'", fields[i]))
    };
    Ok(PostalLocation {
        country_code: fields[0].to_string(),
        postal_code: fields[1].to_string(),
        place_name: fields[2].to_string(),
        state_name: fields[3].to_string(),
        state_code: fields[4].to_string(),
        county_name: fields[5].to_string(),
        county_code: fields[6].to_string(),
        community_name: fields[7].to_string(),
        community_code: fields[8].to_string(),
        latitude: coord(9, "latitude")?,
        longitude: coord(10, "longitude")?,
        accuracy: fields.get(11).and_then(|a| a.trim().parse().ok()),
    })
}

/// Canonical form of a postal code for `country`.
///
/// Trims and upper-cases. US ZIP+4 codes keep the five-digit part; GB, IE
/// and CA keep the outward code because the dumps only carry that part.
pub fn normalize_postal_code(country: &str, code: &str) -> String {
    let code = code.trim().to_ascii_uppercase();
    match country.to_ascii_uppercase().as_str() {
        "US" => code.split('-').next().unwrap_or_default().trim().to_string(),
        "GB" | "IE" => code.split_whitespace().next().unwrap_or_default().to_string(),
        "CA" => code.chars().filter(|c| !c.is_whitespace()).take(3).collect(),
        _ => code,
    }
}

/// Validate a two-letter country code and return it upper-cased.
pub fn validate_country(country: &str) -> Result<String, GeocodeError> {
    let trimmed = country.trim();
    if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(trimmed.to_ascii_uppercase())
    } else {
        Err(GeocodeError::InvalidCountry(country.to_string()))
    }
}

/// Loads per-country postal indexes, downloading them on first use.
pub struct Geocoder {
    dataset_url: String,
    cache_dir: PathBuf,
}

impl Geocoder {
    pub fn new(settings: &GeocodeSettings) -> Result<Self, GeocodeError> {
        let cache_dir = match &settings.cache_dir {
            Some(dir) => dir.clone(),
            None => dirs::cache_dir()
                .ok_or(GeocodeError::NoCacheDir)?
                .join("chorekit")
                .join("postal"),
        };
        Ok(Self {
            dataset_url: settings.dataset_url.trim_end_matches('/').to_string(),
            cache_dir,
        })
    }

    pub fn cache_path(&self, country: &str) -> PathBuf {
        self.cache_dir.join(format!("{country}.txt"))
    }

    /// Index for `country`, from cache or freshly downloaded.
    pub fn load(&self, country: &str) -> Result<PostalIndex, GeocodeError> {
        let country = validate_country(country)?;
        let path = self.cache_path(&country);
        if path.is_file() {
            match read_index(&country, &path) {
                Ok(index) => return Ok(index),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "discarding unreadable postal code cache");
                    std::fs::remove_file(&path).map_err(|source| GeocodeError::Io {
                        path: path.clone(),
                        source,
                    })?;
                }
            }
        }
        self.download(&country)?;
        read_index(&country, &path)
    }

    fn download(&self, country: &str) -> Result<(), GeocodeError> {
        let url = format!("{}/{country}.zip", self.dataset_url);
        info!(%url, "downloading postal code data");
        let download_err = |source| GeocodeError::Download {
            url: url.clone(),
            source,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(download_err)?;
        let bytes = client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.bytes())
            .map_err(download_err)?;

        let text = extract_country_file(country, &bytes)?;
        self.write_cache(country, &text)
    }

    /// Store `data` as the cache for `country`. The file only appears under
    /// its final name once fully written.
    fn write_cache(&self, country: &str, data: &[u8]) -> Result<(), GeocodeError> {
        let dest = self.cache_path(country);
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| GeocodeError::Io { path, source }
        };

        std::fs::create_dir_all(&self.cache_dir).map_err(io_err(&self.cache_dir))?;
        let mut tmp =
            tempfile::NamedTempFile::new_in(&self.cache_dir).map_err(io_err(&self.cache_dir))?;
        tmp.write_all(data).map_err(io_err(tmp.path()))?;
        tmp.as_file().sync_all().map_err(io_err(tmp.path()))?;
        tmp.persist(&dest).map_err(|e| GeocodeError::Io {
            path: dest.clone(),
            source: e.error,
        })?;
        debug!(path = %dest.display(), "postal code data cached");
        Ok(())
    }
}

fn read_index(country: &str, path: &Path) -> Result<PostalIndex, GeocodeError> {
    let file = std::fs::File::open(path).map_err(|source| GeocodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    PostalIndex::parse(country, BufReader::new(file))
}

/// Pull `{country}.txt` out of a GeoNames zip archive.
pub fn extract_country_file(country: &str, archive: &[u8]) -> Result<Vec<u8>, GeocodeError> {
    let archive_err = |source| GeocodeError::Archive {
        country: country.to_string(),
        source,
    };
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).map_err(archive_err)?;
    let mut file = zip
        .by_name(&format!("{country}.txt"))
        .map_err(archive_err)?;
    let mut out = Vec::new();
    file.read_to_end(&mut out).map_err(|source| GeocodeError::Io {
        path: PathBuf::from(format!("{country}.zip")),
        source,
    })?;
    Ok(out)
}
