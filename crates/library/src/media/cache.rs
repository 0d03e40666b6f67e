use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tunedex_index::{Album, Artist, Folder, Id};

/// Records already resolved during one media scan, so that each is loaded or
/// created at most once. Dropped with the scan.
#[derive(Debug, Default)]
pub(crate) struct Cache {
    folders: HashMap<PathBuf, Folder>,
    artists: HashMap<String, Artist>,
    // Keyed by artist ID, then album title.
    albums: HashMap<Id, HashMap<String, Album>>,
}
impl Cache {
    pub(crate) fn folder(&self, path: &Path) -> Option<&Folder> {
        self.folders.get(path)
    }

    pub(crate) fn insert_folder(&mut self, folder: Folder) {
        self.folders.insert(folder.path.clone(), folder);
    }

    pub(crate) fn artist(&self, title: &str) -> Option<&Artist> {
        self.artists.get(title)
    }

    pub(crate) fn insert_artist(&mut self, artist: Artist) {
        self.artists.insert(artist.title.clone(), artist);
    }

    pub(crate) fn album(&self, artist_id: Id, title: &str) -> Option<&Album> {
        self.albums.get(&artist_id)?.get(title)
    }

    pub(crate) fn insert_album(&mut self, album: Album) {
        self.albums.entry(album.artist_id).or_default().insert(album.title.clone(), album);
    }
}
